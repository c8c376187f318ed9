// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the supportdesk backend.
//!
//! Backends extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod assist;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use assist::{AutoResponder, KnowledgeMatcher, TicketClassifier, TranscriptSummarizer};
pub use provider::ProviderAdapter;
pub use storage::TicketStore;
