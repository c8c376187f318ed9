// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end ticket pipeline tests.
//!
//! `TestHarness` assembles a temp SQLite store, scripted assistants, and a
//! `TicketService` wired to both, plus helpers to seed reference data.

use std::sync::Arc;

use supportdesk_config::model::{StorageConfig, TriageConfig};
use supportdesk_core::types::{new_id, now_timestamp};
use supportdesk_core::{
    DeskError, Solution, Supporter, Team, Ticket, TicketMessage, TicketStore, User, UserRole,
};
use supportdesk_storage::SqliteStore;
use supportdesk_triage::{Assistants, TicketService};

use crate::scripted::ScriptedAssistants;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    triage: TriageConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            triage: TriageConfig::default(),
        }
    }

    /// Turn background triage off.
    pub fn with_triage_disabled(mut self) -> Self {
        self.triage.enabled = false;
        self
    }

    /// Set the knowledge-base match confidence threshold.
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.triage.match_confidence_threshold = threshold;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, DeskError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| DeskError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let store = Arc::new(SqliteStore::open(&storage_config).await?);

        let assistants = Arc::new(ScriptedAssistants::new());
        let service = TicketService::new(
            store.clone(),
            Assistants::uniform(assistants.clone()),
            self.triage,
        );

        Ok(TestHarness {
            store,
            assistants,
            service,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with scripted assistants and temp storage.
pub struct TestHarness {
    /// SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<SqliteStore>,
    /// Assistant roles under test control.
    pub assistants: Arc<ScriptedAssistants>,
    /// The service under test.
    pub service: TicketService,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings.
    pub async fn new() -> Result<Self, DeskError> {
        Self::builder().build().await
    }

    pub async fn seed_team(&self, name: &str) -> Result<Team, DeskError> {
        let team = Team {
            team_id: new_id(),
            team_name: name.to_string(),
            team_description: Some(format!("{name} questions")),
            created_at: now_timestamp(),
        };
        self.store.insert_team(&team).await?;
        Ok(team)
    }

    /// Seed a user whose token hash is `token_hash`.
    pub async fn seed_user_with_token_hash(
        &self,
        name: &str,
        role: UserRole,
        token_hash: &str,
    ) -> Result<User, DeskError> {
        let user = User {
            user_id: new_id(),
            user_name: name.to_string(),
            user_type: role,
            created_at: now_timestamp(),
        };
        self.store.insert_user(&user, token_hash).await?;
        Ok(user)
    }

    pub async fn seed_user(&self, name: &str, role: UserRole) -> Result<User, DeskError> {
        self.seed_user_with_token_hash(name, role, &new_id()).await
    }

    /// Seed a supporter account (user plus supporter profile) in `team_id`.
    pub async fn seed_supporter(
        &self,
        name: &str,
        team_id: Option<&str>,
    ) -> Result<(User, Supporter), DeskError> {
        let user = self.seed_user(name, UserRole::Supporter).await?;
        let supporter = Supporter {
            supporter_id: new_id(),
            user_id: user.user_id.clone(),
            team_id: team_id.map(str::to_string),
            supporter_name: name.to_string(),
            created_at: now_timestamp(),
        };
        self.store.insert_supporter(&supporter).await?;
        Ok((user, supporter))
    }

    pub async fn seed_solution(
        &self,
        team_id: &str,
        problem: &str,
        solution: &str,
    ) -> Result<Solution, DeskError> {
        let entry = Solution::new(team_id, None, problem, solution);
        self.store.insert_solution(&entry).await?;
        Ok(entry)
    }

    /// Current stored state of a ticket.
    pub async fn ticket(&self, ticket_id: &str) -> Result<Ticket, DeskError> {
        self.store
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| DeskError::not_found("ticket", ticket_id))
    }

    pub async fn messages(&self, ticket_id: &str) -> Result<Vec<TicketMessage>, DeskError> {
        self.store.list_messages(ticket_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_and_seeds() {
        let harness = TestHarness::new().await.unwrap();
        let team = harness.seed_team("Accounts").await.unwrap();
        let (user, supporter) = harness
            .seed_supporter("Sam", Some(&team.team_id))
            .await
            .unwrap();
        assert_eq!(supporter.user_id, user.user_id);
        assert_eq!(harness.store.list_teams().await.unwrap().len(), 1);
    }
}
