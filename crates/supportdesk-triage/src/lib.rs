// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket lifecycle and background triage for supportdesk.
//!
//! [`TicketService`] owns the public ticket operations. Creating a ticket
//! queues a triage job (classify, match against the team's knowledge base,
//! auto-respond or escalate); resolving one queues a summarization job that
//! may add the resolution to the knowledge base. Background jobs run on a
//! [`TicketWorkQueue`] that serializes work per ticket.

pub mod assist;
pub mod lifecycle;
pub mod ordering;
pub mod pipeline;
pub mod queue;
pub mod service;

pub use assist::{AssistantModels, LlmAssistant};
pub use pipeline::{Assistants, SummaryOutcome, TriageOutcome};
pub use queue::TicketWorkQueue;
pub use service::{QueueScope, TicketListQuery, TicketService};
