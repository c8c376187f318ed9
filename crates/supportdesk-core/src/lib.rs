// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the supportdesk ticketing backend.
//!
//! This crate provides the domain types, the crate-wide error type, and
//! the adapter traits (store, LLM provider, assistant roles) that every
//! other workspace crate builds on.

pub mod error;
pub mod traits;
pub mod types;

pub use error::DeskError;
pub use types::{
    Classification, Difficulty, HealthStatus, MatchVerdict, NewTicket, Patch, Priority,
    ProviderRequest, ProviderResponse, ResolutionSummary, SenderType, Solution, SortOrder,
    StatusSet, Supporter, Team, Ticket, TicketFilter, TicketMessage, TicketPatch, TicketStatus,
    TicketWithMessages, TokenUsage, Tone, User, UserRole,
};

pub use traits::{
    AutoResponder, KnowledgeMatcher, PluginAdapter, ProviderAdapter, TicketClassifier, TicketStore,
    TranscriptSummarizer,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_traits_are_exported() {
        // Compiles only if every trait is reachable from the crate root.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_ticket_store<T: TicketStore>() {}
        fn _assert_classifier<T: TicketClassifier>() {}
        fn _assert_matcher<T: KnowledgeMatcher>() {}
        fn _assert_responder<T: AutoResponder>() {}
        fn _assert_summarizer<T: TranscriptSummarizer>() {}
    }

    #[test]
    fn traits_are_object_safe() {
        fn _store(_: &dyn TicketStore) {}
        fn _provider(_: &dyn ProviderAdapter) {}
        fn _classifier(_: &dyn TicketClassifier) {}
    }
}
