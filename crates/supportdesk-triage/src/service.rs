// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public ticket operations.
//!
//! Synchronous-path failures (validation, missing rows, store errors) are
//! returned to the caller. Triage and summarization run on the per-ticket
//! work queue after the call has returned; their failures are only logged.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use supportdesk_config::model::TriageConfig;
use supportdesk_core::{
    DeskError, NewTicket, Patch, Priority, SenderType, Solution, SortOrder, StatusSet, Ticket,
    TicketFilter, TicketMessage, TicketPatch, TicketStore, TicketWithMessages,
};

use crate::lifecycle;
use crate::ordering;
use crate::pipeline::{Assistants, Pipeline};
use crate::queue::TicketWorkQueue;

/// Filters and ordering for a status-filtered listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketListQuery {
    pub statuses: Option<StatusSet>,
    /// Applied in memory after retrieval, stable on ties.
    pub sort_priority: Option<SortOrder>,
    /// Creation-time ordering, done by the store.
    pub sort_date: Option<SortOrder>,
    pub priority: Option<Priority>,
}

/// Whose tickets a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueScope {
    /// Every ticket (administrators).
    All,
    /// Tickets opened by this user.
    Requester(String),
    /// Tickets of the team this supporter's user account belongs to.
    Supporter(String),
}

struct ServiceInner {
    store: Arc<dyn TicketStore>,
    pipeline: Arc<Pipeline>,
    queue: TicketWorkQueue,
    settings: TriageConfig,
}

/// Ticket lifecycle operations with background triage and summarization.
#[derive(Clone)]
pub struct TicketService {
    inner: Arc<ServiceInner>,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>, assistants: Assistants, settings: TriageConfig) -> Self {
        let pipeline = Arc::new(Pipeline::new(
            store.clone(),
            assistants,
            settings.match_confidence_threshold,
        ));
        Self {
            inner: Arc::new(ServiceInner {
                store,
                pipeline,
                queue: TicketWorkQueue::new(),
                settings,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.inner.store
    }

    pub fn queue(&self) -> &TicketWorkQueue {
        &self.inner.queue
    }

    /// Opens a ticket and queues triage. The returned ticket is pre-triage.
    pub async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, DeskError> {
        if new.requester_id.trim().is_empty() {
            return Err(DeskError::Validation("requester is required".to_string()));
        }
        if let Some(team_id) = &new.team_id {
            self.require_team(team_id).await?;
        }

        let ticket = Ticket::new(new);
        self.inner.store.insert_ticket(&ticket).await?;

        if let Some(content) = ticket.content_text() {
            let message = TicketMessage::new(&ticket.ticket_id, SenderType::User, content);
            self.inner.store.insert_message(&message).await?;

            if self.inner.settings.enabled {
                self.submit_triage(&ticket.ticket_id);
            } else {
                debug!(ticket_id = %ticket.ticket_id, "triage disabled, ticket left open");
            }
        }

        info!(ticket_id = %ticket.ticket_id, requester = %ticket.user_id, "ticket created");
        Ok(ticket)
    }

    /// Records a reply and moves the ticket to the side now expected to answer.
    pub async fn reply(
        &self,
        ticket_id: &str,
        sender: SenderType,
        content: &str,
    ) -> Result<TicketMessage, DeskError> {
        let status = lifecycle::status_after_reply(sender)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(DeskError::Validation("content is required".to_string()));
        }

        let message = TicketMessage::new(ticket_id, sender, content);
        self.inner
            .store
            .record_reply(&message, status)
            .await?
            .ok_or_else(|| DeskError::not_found("ticket", ticket_id))?;

        debug!(ticket_id, sender = %sender, status = %status, "reply recorded");
        Ok(message)
    }

    /// Applies a partial update. Setting status to `resolved` queues summarization.
    pub async fn update_ticket(&self, ticket_id: &str, patch: TicketPatch) -> Result<Ticket, DeskError> {
        if patch.is_empty() {
            return Err(DeskError::Validation("no fields to update".to_string()));
        }
        if let Patch::Value(team_id) = &patch.team_id {
            self.require_team(team_id).await?;
        }
        if let Some(requester) = &patch.requester_id
            && requester.trim().is_empty()
        {
            return Err(DeskError::Validation("user_id must not be empty".to_string()));
        }

        let ticket = self
            .inner
            .store
            .update_ticket(ticket_id, &patch)
            .await?
            .ok_or_else(|| DeskError::not_found("ticket", ticket_id))?;

        if lifecycle::triggers_summary(&patch) {
            self.submit_summary(ticket_id);
        }
        debug!(ticket_id, status = %ticket.status, "ticket updated");
        Ok(ticket)
    }

    /// Status-filtered listing for a requester, a supporter's team, or everyone.
    pub async fn list_by_status(
        &self,
        query: &TicketListQuery,
        scope: &QueueScope,
    ) -> Result<Vec<Ticket>, DeskError> {
        let mut filter = TicketFilter {
            statuses: query.statuses.clone(),
            priority: query.priority,
            date_order: query.sort_date,
            ..TicketFilter::default()
        };

        match scope {
            QueueScope::All => {}
            QueueScope::Requester(user_id) => filter.requester_id = Some(user_id.clone()),
            QueueScope::Supporter(user_id) => {
                let supporter = self
                    .inner
                    .store
                    .get_supporter_by_user(user_id)
                    .await?
                    .ok_or_else(|| DeskError::not_found("supporter", user_id.as_str()))?;
                let Some(team_id) = supporter.team_id else {
                    debug!(user_id = %user_id, "supporter has no team, queue is empty");
                    return Ok(Vec::new());
                };
                filter.team_id = Some(team_id);
            }
        }

        let mut tickets = self.inner.store.list_tickets(&filter).await?;
        if let Some(order) = query.sort_priority {
            ordering::sort_by_priority(&mut tickets, order);
        }
        Ok(tickets)
    }

    pub async fn get_ticket(&self, ticket_id: &str) -> Result<Ticket, DeskError> {
        self.inner
            .store
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| DeskError::not_found("ticket", ticket_id))
    }

    /// A ticket with its transcript, oldest message first.
    pub async fn get_with_transcript(&self, ticket_id: &str) -> Result<TicketWithMessages, DeskError> {
        let ticket = self.get_ticket(ticket_id).await?;
        let messages = self.inner.store.list_messages(ticket_id).await?;
        Ok(TicketWithMessages { ticket, messages })
    }

    /// Hard delete, including the transcript.
    pub async fn delete_ticket(&self, ticket_id: &str) -> Result<(), DeskError> {
        if !self.inner.store.delete_ticket(ticket_id).await? {
            return Err(DeskError::not_found("ticket", ticket_id));
        }
        info!(ticket_id, "ticket deleted");
        Ok(())
    }

    // --- Knowledge base ---

    pub async fn create_solution(
        &self,
        team_id: &str,
        problem: &str,
        solution: &str,
    ) -> Result<Solution, DeskError> {
        let (problem, solution) = require_problem_and_solution(problem, solution)?;
        if team_id.trim().is_empty() {
            return Err(DeskError::Validation("team_id is required".to_string()));
        }
        self.require_team(team_id).await?;

        let entry = Solution::new(team_id, None, problem, solution);
        self.inner.store.insert_solution(&entry).await?;
        info!(solution_id = %entry.solution_id, team_id, "solution created");
        Ok(entry)
    }

    pub async fn get_solution(&self, solution_id: &str) -> Result<Solution, DeskError> {
        self.inner
            .store
            .get_solution(solution_id)
            .await?
            .ok_or_else(|| DeskError::not_found("solution", solution_id))
    }

    /// Newest first; all teams when `team_id` is `None`.
    pub async fn list_solutions(&self, team_id: Option<&str>) -> Result<Vec<Solution>, DeskError> {
        self.inner.store.list_solutions(team_id).await
    }

    pub async fn update_solution(
        &self,
        solution_id: &str,
        problem: &str,
        solution: &str,
    ) -> Result<Solution, DeskError> {
        let (problem, solution) = require_problem_and_solution(problem, solution)?;
        self.inner
            .store
            .update_solution(solution_id, problem, solution)
            .await?
            .ok_or_else(|| DeskError::not_found("solution", solution_id))
    }

    pub async fn delete_solution(&self, solution_id: &str) -> Result<(), DeskError> {
        if !self.inner.store.delete_solution(solution_id).await? {
            return Err(DeskError::not_found("solution", solution_id));
        }
        Ok(())
    }

    // --- Background work ---

    /// Waits until all queued background jobs have finished.
    pub async fn wait_idle(&self) {
        self.inner.queue.wait_idle().await;
    }

    /// Drains background jobs for up to `timeout`. Returns `true` if drained.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.inner.queue.shutdown(timeout).await
    }

    fn submit_triage(&self, ticket_id: &str) {
        let pipeline = self.inner.pipeline.clone();
        let id = ticket_id.to_string();
        self.inner.queue.submit(ticket_id, "triage", async move {
            let outcome = pipeline.triage(&id).await?;
            debug!(ticket_id = %id, outcome = ?outcome, "triage finished");
            Ok(())
        });
    }

    fn submit_summary(&self, ticket_id: &str) {
        let pipeline = self.inner.pipeline.clone();
        let id = ticket_id.to_string();
        self.inner.queue.submit(ticket_id, "summarize", async move {
            let outcome = pipeline.summarize(&id).await?;
            debug!(ticket_id = %id, outcome = ?outcome, "summarization finished");
            Ok(())
        });
    }

    async fn require_team(&self, team_id: &str) -> Result<(), DeskError> {
        match self.inner.store.get_team(team_id).await? {
            Some(_) => Ok(()),
            None => Err(DeskError::Validation(format!("team `{team_id}` does not exist"))),
        }
    }
}

fn require_problem_and_solution<'a>(
    problem: &'a str,
    solution: &'a str,
) -> Result<(&'a str, &'a str), DeskError> {
    let (problem, solution) = (problem.trim(), solution.trim());
    if problem.is_empty() || solution.is_empty() {
        return Err(DeskError::Validation(
            "problem and solution are required".to_string(),
        ));
    }
    Ok((problem, solution))
}
