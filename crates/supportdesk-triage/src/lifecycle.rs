// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket status transitions.
//!
//! The state machine never rejects a transition: an explicit update may set
//! any status, and a reply always moves the ticket to whichever side is now
//! expected to answer, even out of `resolved`.

use supportdesk_core::{DeskError, SenderType, TicketPatch, TicketStatus};

/// Status a ticket takes after a reply from `sender`.
///
/// A supporter reply waits on the user; a user reply waits on a supporter.
/// Bot messages are only posted by background triage, never as replies.
pub fn status_after_reply(sender: SenderType) -> Result<TicketStatus, DeskError> {
    match sender {
        SenderType::Supporter => Ok(TicketStatus::PendingUser),
        SenderType::User => Ok(TicketStatus::PendingSupporter),
        SenderType::Bot => Err(DeskError::Validation(
            "sender_type must be `user` or `supporter`".to_string(),
        )),
    }
}

/// Whether applying `patch` should enqueue resolution summarization.
///
/// Only an explicit status of exactly `resolved` counts, including
/// `resolved` -> `resolved`.
pub fn triggers_summary(patch: &TicketPatch) -> bool {
    patch.status == Some(TicketStatus::Resolved)
}
