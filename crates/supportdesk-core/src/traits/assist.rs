// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The four assistant roles used by the triage pipeline.
//!
//! Each role is a separate trait so tests can script them independently.
//! Implementations may fail with [`DeskError::Provider`] on transport or
//! parse errors; callers treat that as "no outcome".

use async_trait::async_trait;

use crate::error::DeskError;
use crate::types::{Classification, MatchVerdict, ResolutionSummary, Solution, Team, TicketMessage};

/// Assigns difficulty, priority, tone, and an optional team to a ticket.
#[async_trait]
pub trait TicketClassifier: Send + Sync + 'static {
    async fn classify(&self, content: &str, teams: &[Team]) -> Result<Classification, DeskError>;
}

/// Decides whether one of a team's known solutions answers the ticket.
#[async_trait]
pub trait KnowledgeMatcher: Send + Sync + 'static {
    async fn find_match(
        &self,
        content: &str,
        solutions: &[Solution],
    ) -> Result<MatchVerdict, DeskError>;
}

/// Drafts a direct answer for easy tickets.
#[async_trait]
pub trait AutoResponder: Send + Sync + 'static {
    async fn respond(
        &self,
        content: &str,
        classification: &Classification,
    ) -> Result<String, DeskError>;
}

/// Condenses a resolved conversation into a reusable (problem, solution) pair.
#[async_trait]
pub trait TranscriptSummarizer: Send + Sync + 'static {
    async fn summarize(
        &self,
        ticket_content: Option<&str>,
        transcript: &[TicketMessage],
    ) -> Result<ResolutionSummary, DeskError>;
}
