// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background jobs: ticket triage after creation, resolution summarization
//! after a ticket is marked resolved.
//!
//! Both jobs are best-effort. Each store write is atomic on its own, but a
//! failure mid-sequence leaves whatever the earlier steps wrote.

use std::sync::Arc;

use tracing::{debug, info};

use supportdesk_core::{
    AutoResponder, Classification, DeskError, Difficulty, KnowledgeMatcher, Patch, SenderType,
    Solution, Team, TicketClassifier, TicketMessage, TicketPatch, TicketStatus, TicketStore,
    TranscriptSummarizer,
};

/// Fallback wording when the ticket has no assigned team.
const UNASSIGNED_TEAM_NAME: &str = "our support team";

/// The assistant roles used by background jobs.
#[derive(Clone)]
pub struct Assistants {
    pub classifier: Arc<dyn TicketClassifier>,
    pub matcher: Arc<dyn KnowledgeMatcher>,
    pub responder: Arc<dyn AutoResponder>,
    pub summarizer: Arc<dyn TranscriptSummarizer>,
}

impl Assistants {
    /// Uses one implementation for every role.
    pub fn uniform<A>(assistant: Arc<A>) -> Self
    where
        A: TicketClassifier + KnowledgeMatcher + AutoResponder + TranscriptSummarizer,
    {
        Self {
            classifier: assistant.clone(),
            matcher: assistant.clone(),
            responder: assistant.clone(),
            summarizer: assistant,
        }
    }
}

/// How a triage run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    /// Resolved from the team's knowledge base.
    Matched,
    /// Easy ticket resolved with a generated reply.
    AutoResponded,
    /// Classified and left for a supporter.
    Escalated,
    /// Ticket has no content, or was deleted before the job ran.
    Skipped,
}

/// How a summarization run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// A new solution was stored under this id.
    Remembered(String),
    /// The summarizer advised against remembering.
    Discarded,
    /// No team or no transcript, or the ticket is gone.
    Skipped,
}

pub(crate) struct Pipeline {
    store: Arc<dyn TicketStore>,
    assistants: Assistants,
    match_threshold: f64,
}

impl Pipeline {
    pub(crate) fn new(
        store: Arc<dyn TicketStore>,
        assistants: Assistants,
        match_threshold: f64,
    ) -> Self {
        Self {
            store,
            assistants,
            match_threshold,
        }
    }

    /// Classify, then resolve from the knowledge base, auto-respond, or escalate.
    pub(crate) async fn triage(&self, ticket_id: &str) -> Result<TriageOutcome, DeskError> {
        let Some(ticket) = self.store.get_ticket(ticket_id).await? else {
            debug!(ticket_id, "ticket gone before triage");
            return Ok(TriageOutcome::Skipped);
        };
        let Some(content) = ticket.content_text() else {
            return Ok(TriageOutcome::Skipped);
        };

        let teams = self.store.list_teams().await?;
        let mut classification = self.assistants.classifier.classify(content, &teams).await?;
        if let Some(team_id) = &classification.team_id
            && !teams.iter().any(|t| &t.team_id == team_id)
        {
            classification.team_id = None;
        }
        debug!(
            ticket_id,
            difficulty = %classification.difficulty,
            priority = %classification.priority,
            tone = %classification.tone,
            team_id = ?classification.team_id,
            "ticket classified"
        );

        if let Some(team_id) = &classification.team_id {
            let solutions = self.store.list_solutions(Some(team_id)).await?;
            let verdict = self.assistants.matcher.find_match(content, &solutions).await?;
            if let Some(solution) = verdict.accepted_solution(self.match_threshold) {
                let patch = TicketPatch {
                    difficulty: Patch::Value(Difficulty::Easy),
                    status: Some(TicketStatus::Resolved),
                    ..classification_patch(&classification)
                };
                self.apply(ticket_id, &patch).await?;
                self.post_bot_message(ticket_id, solution).await?;
                info!(ticket_id, confidence = verdict.confidence, "ticket resolved from knowledge base");
                return Ok(TriageOutcome::Matched);
            }
        }

        if classification.difficulty == Difficulty::Easy {
            let reply = self
                .assistants
                .responder
                .respond(content, &classification)
                .await?;
            let patch = TicketPatch {
                status: Some(TicketStatus::Resolved),
                ..classification_patch(&classification)
            };
            self.apply(ticket_id, &patch).await?;
            self.post_bot_message(ticket_id, &reply).await?;
            info!(ticket_id, "ticket resolved with auto-response");
            return Ok(TriageOutcome::AutoResponded);
        }

        self.apply(ticket_id, &classification_patch(&classification))
            .await?;
        let assigned = classification.team_id.as_deref().or(ticket.team_id.as_deref());
        let team_name = team_name(&teams, assigned);
        self.post_bot_message(ticket_id, &acknowledgment(team_name))
            .await?;
        info!(ticket_id, team = team_name, "ticket escalated to supporters");
        Ok(TriageOutcome::Escalated)
    }

    /// Summarize a resolved conversation and remember it if advised.
    pub(crate) async fn summarize(&self, ticket_id: &str) -> Result<SummaryOutcome, DeskError> {
        let Some(ticket) = self.store.get_ticket(ticket_id).await? else {
            return Ok(SummaryOutcome::Skipped);
        };
        let Some(team_id) = ticket.team_id.clone() else {
            debug!(ticket_id, "resolved ticket has no team, not summarizing");
            return Ok(SummaryOutcome::Skipped);
        };
        let transcript = self.store.list_messages(ticket_id).await?;
        if transcript.is_empty() {
            return Ok(SummaryOutcome::Skipped);
        }

        let summary = self
            .assistants
            .summarizer
            .summarize(ticket.content_text(), &transcript)
            .await?;
        if !summary.should_remember {
            debug!(ticket_id, "summary not worth remembering");
            return Ok(SummaryOutcome::Discarded);
        }

        let solution = Solution::new(
            team_id,
            Some(ticket_id.to_string()),
            summary.problem,
            summary.solution,
        );
        self.store.insert_solution(&solution).await?;
        info!(
            ticket_id,
            solution_id = %solution.solution_id,
            team_id = %solution.team_id,
            "resolution remembered"
        );
        Ok(SummaryOutcome::Remembered(solution.solution_id))
    }

    async fn apply(&self, ticket_id: &str, patch: &TicketPatch) -> Result<(), DeskError> {
        self.store
            .update_ticket(ticket_id, patch)
            .await?
            .map(|_| ())
            .ok_or_else(|| DeskError::not_found("ticket", ticket_id))
    }

    async fn post_bot_message(&self, ticket_id: &str, content: &str) -> Result<(), DeskError> {
        let message = TicketMessage::new(ticket_id, SenderType::Bot, content);
        self.store.insert_message(&message).await
    }
}

/// The classification fields as a patch that leaves status untouched.
///
/// A classification without a team keeps whatever team the ticket already has.
fn classification_patch(classification: &Classification) -> TicketPatch {
    TicketPatch {
        priority: Patch::Value(classification.priority),
        tone: Patch::Value(classification.tone),
        difficulty: Patch::Value(classification.difficulty),
        team_id: match &classification.team_id {
            Some(team_id) => Patch::Value(team_id.clone()),
            None => Patch::Absent,
        },
        ..TicketPatch::default()
    }
}

fn team_name<'a>(teams: &'a [Team], team_id: Option<&str>) -> &'a str {
    team_id
        .and_then(|id| teams.iter().find(|t| t.team_id == id))
        .map(|t| t.team_name.as_str())
        .unwrap_or(UNASSIGNED_TEAM_NAME)
}

fn acknowledgment(team_name: &str) -> String {
    format!(
        "Thanks for reaching out. Your ticket has been forwarded to {team_name}, \
         and a supporter will reply as soon as possible."
    )
}
