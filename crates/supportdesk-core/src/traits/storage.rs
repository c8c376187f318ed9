// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket store trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::DeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Solution, Supporter, Team, Ticket, TicketFilter, TicketMessage, TicketPatch, TicketStatus,
    User,
};

/// Persistence for tickets, messages, the knowledge base, and the
/// reference entities (teams, supporters, users).
///
/// Each method is atomic on its own. Multi-step sequences across calls
/// are not, except [`TicketStore::record_reply`].
#[async_trait]
pub trait TicketStore: PluginAdapter {
    // --- Tickets ---

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), DeskError>;

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<Ticket>, DeskError>;

    /// Writes only the supplied fields. Returns `None` if the ticket does not exist.
    async fn update_ticket(
        &self,
        ticket_id: &str,
        patch: &TicketPatch,
    ) -> Result<Option<Ticket>, DeskError>;

    /// Hard-deletes a ticket and its messages. Returns false if absent.
    async fn delete_ticket(&self, ticket_id: &str) -> Result<bool, DeskError>;

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, DeskError>;

    // --- Messages ---

    async fn insert_message(&self, message: &TicketMessage) -> Result<(), DeskError>;

    /// Messages of a ticket ordered by creation time ascending.
    async fn list_messages(&self, ticket_id: &str) -> Result<Vec<TicketMessage>, DeskError>;

    /// Inserts a reply and moves the ticket to `status` in one transaction.
    ///
    /// Returns `None` (and writes nothing) if the ticket does not exist.
    async fn record_reply(
        &self,
        message: &TicketMessage,
        status: TicketStatus,
    ) -> Result<Option<Ticket>, DeskError>;

    // --- Solutions ---

    async fn insert_solution(&self, solution: &Solution) -> Result<(), DeskError>;

    async fn get_solution(&self, solution_id: &str) -> Result<Option<Solution>, DeskError>;

    /// Replaces problem and solution text. Returns `None` if absent.
    async fn update_solution(
        &self,
        solution_id: &str,
        problem: &str,
        solution: &str,
    ) -> Result<Option<Solution>, DeskError>;

    async fn delete_solution(&self, solution_id: &str) -> Result<bool, DeskError>;

    /// Solutions newest first, optionally restricted to one team.
    async fn list_solutions(&self, team_id: Option<&str>) -> Result<Vec<Solution>, DeskError>;

    // --- Teams ---

    async fn insert_team(&self, team: &Team) -> Result<(), DeskError>;

    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, DeskError>;

    async fn list_teams(&self) -> Result<Vec<Team>, DeskError>;

    async fn delete_team(&self, team_id: &str) -> Result<bool, DeskError>;

    // --- Supporters ---

    async fn insert_supporter(&self, supporter: &Supporter) -> Result<(), DeskError>;

    async fn get_supporter(&self, supporter_id: &str) -> Result<Option<Supporter>, DeskError>;

    /// The supporter profile linked to a user account, if any.
    async fn get_supporter_by_user(&self, user_id: &str) -> Result<Option<Supporter>, DeskError>;

    async fn list_supporters(&self) -> Result<Vec<Supporter>, DeskError>;

    async fn delete_supporter(&self, supporter_id: &str) -> Result<bool, DeskError>;

    // --- Users ---

    /// Stores a user together with the SHA-256 hex digest of their API token.
    async fn insert_user(&self, user: &User, token_hash: &str) -> Result<(), DeskError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DeskError>;

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, DeskError>;

    async fn list_users(&self) -> Result<Vec<User>, DeskError>;

    async fn delete_user(&self, user_id: &str) -> Result<bool, DeskError>;
}
