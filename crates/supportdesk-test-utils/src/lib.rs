// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for supportdesk integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock LLM provider with pre-configured responses
//! - [`ScriptedAssistants`] - Programmable assistant roles with call counters
//! - [`TestHarness`] - Temp SQLite store plus a wired `TicketService`

pub mod harness;
pub mod mock_provider;
pub mod scripted;

pub use harness::TestHarness;
pub use mock_provider::MockProvider;
pub use scripted::{AssistantRole, ScriptedAssistants};
