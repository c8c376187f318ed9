// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity types persisted by the store.
//!
//! The canonical definitions live in `supportdesk-core::types` so they can
//! cross the [`TicketStore`](supportdesk_core::TicketStore) boundary; this
//! module re-exports them for use within the storage crate.

pub use supportdesk_core::types::{
    Solution, Supporter, Team, Ticket, TicketFilter, TicketMessage, TicketPatch, User,
};
