// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`TicketStore`] trait.

use async_trait::async_trait;
use tracing::debug;

use supportdesk_config::model::StorageConfig;
use supportdesk_core::types::TicketStatus;
use supportdesk_core::{DeskError, HealthStatus, PluginAdapter, TicketStore};

use crate::database::Database;
use crate::models::{Solution, Supporter, Team, Ticket, TicketFilter, TicketMessage, TicketPatch, User};
use crate::queries;

/// SQLite-backed ticket store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
    wal_mode: bool,
}

impl SqliteStore {
    /// Open the configured database, creating and migrating it as needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, DeskError> {
        let db = Database::open_with_options(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite ticket store initialized");
        Ok(Self {
            db,
            wal_mode: config.wal_mode,
        })
    }

    /// Wrap an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self { db, wal_mode: true }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, DeskError> {
        let result = self
            .db
            .connection()
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await;
        Ok(match result {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), DeskError> {
        if self.wal_mode {
            self.db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for SqliteStore {
    // --- Tickets ---

    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), DeskError> {
        queries::tickets::insert_ticket(&self.db, ticket).await
    }

    async fn get_ticket(&self, ticket_id: &str) -> Result<Option<Ticket>, DeskError> {
        queries::tickets::get_ticket(&self.db, ticket_id).await
    }

    async fn update_ticket(
        &self,
        ticket_id: &str,
        patch: &TicketPatch,
    ) -> Result<Option<Ticket>, DeskError> {
        queries::tickets::update_ticket(&self.db, ticket_id, patch).await
    }

    async fn delete_ticket(&self, ticket_id: &str) -> Result<bool, DeskError> {
        queries::tickets::delete_ticket(&self.db, ticket_id).await
    }

    async fn list_tickets(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, DeskError> {
        queries::tickets::list_tickets(&self.db, filter).await
    }

    // --- Messages ---

    async fn insert_message(&self, message: &TicketMessage) -> Result<(), DeskError> {
        queries::messages::insert_message(&self.db, message).await
    }

    async fn list_messages(&self, ticket_id: &str) -> Result<Vec<TicketMessage>, DeskError> {
        queries::messages::list_messages(&self.db, ticket_id).await
    }

    async fn record_reply(
        &self,
        message: &TicketMessage,
        status: TicketStatus,
    ) -> Result<Option<Ticket>, DeskError> {
        queries::tickets::record_reply(&self.db, message, status).await
    }

    // --- Solutions ---

    async fn insert_solution(&self, solution: &Solution) -> Result<(), DeskError> {
        queries::solutions::insert_solution(&self.db, solution).await
    }

    async fn get_solution(&self, solution_id: &str) -> Result<Option<Solution>, DeskError> {
        queries::solutions::get_solution(&self.db, solution_id).await
    }

    async fn update_solution(
        &self,
        solution_id: &str,
        problem: &str,
        solution: &str,
    ) -> Result<Option<Solution>, DeskError> {
        queries::solutions::update_solution(&self.db, solution_id, problem, solution).await
    }

    async fn delete_solution(&self, solution_id: &str) -> Result<bool, DeskError> {
        queries::solutions::delete_solution(&self.db, solution_id).await
    }

    async fn list_solutions(&self, team_id: Option<&str>) -> Result<Vec<Solution>, DeskError> {
        queries::solutions::list_solutions(&self.db, team_id).await
    }

    // --- Teams ---

    async fn insert_team(&self, team: &Team) -> Result<(), DeskError> {
        queries::directory::insert_team(&self.db, team).await
    }

    async fn get_team(&self, team_id: &str) -> Result<Option<Team>, DeskError> {
        queries::directory::get_team(&self.db, team_id).await
    }

    async fn list_teams(&self) -> Result<Vec<Team>, DeskError> {
        queries::directory::list_teams(&self.db).await
    }

    async fn delete_team(&self, team_id: &str) -> Result<bool, DeskError> {
        queries::directory::delete_team(&self.db, team_id).await
    }

    // --- Supporters ---

    async fn insert_supporter(&self, supporter: &Supporter) -> Result<(), DeskError> {
        queries::directory::insert_supporter(&self.db, supporter).await
    }

    async fn get_supporter(&self, supporter_id: &str) -> Result<Option<Supporter>, DeskError> {
        queries::directory::get_supporter(&self.db, supporter_id).await
    }

    async fn get_supporter_by_user(&self, user_id: &str) -> Result<Option<Supporter>, DeskError> {
        queries::directory::get_supporter_by_user(&self.db, user_id).await
    }

    async fn list_supporters(&self) -> Result<Vec<Supporter>, DeskError> {
        queries::directory::list_supporters(&self.db).await
    }

    async fn delete_supporter(&self, supporter_id: &str) -> Result<bool, DeskError> {
        queries::directory::delete_supporter(&self.db, supporter_id).await
    }

    // --- Users ---

    async fn insert_user(&self, user: &User, token_hash: &str) -> Result<(), DeskError> {
        queries::directory::insert_user(&self.db, user, token_hash).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DeskError> {
        queries::directory::get_user(&self.db, user_id).await
    }

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, DeskError> {
        queries::directory::find_user_by_token_hash(&self.db, token_hash).await
    }

    async fn list_users(&self) -> Result<Vec<User>, DeskError> {
        queries::directory::list_users(&self.db).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, DeskError> {
        queries::directory::delete_user(&self.db, user_id).await
    }
}
