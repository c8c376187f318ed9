// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket routes.
//!
//! Visibility for a single ticket: administrators see every ticket, users
//! their own, supporters the tickets of their team.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use supportdesk_core::{
    DeskError, Difficulty, NewTicket, Priority, SenderType, StatusSet, Ticket, TicketMessage,
    TicketPatch, TicketWithMessages, Tone, UserRole,
};
use supportdesk_triage::{QueueScope, TicketListQuery};

use crate::auth::Caller;
use crate::envelope::{ApiJson, ApiResponse, ApiResult, created, ok};
use crate::server::AppState;

/// Body of `POST /tickets`. The requester is the caller.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTicketRequest {
    #[serde(alias = "priority")]
    pub ticket_priority: Option<Priority>,
    #[serde(alias = "content")]
    pub ticket_content: Option<String>,
    #[serde(alias = "tone")]
    pub ticket_tone: Option<Tone>,
    #[serde(alias = "difficulty")]
    pub ticket_difficulty: Option<Difficulty>,
    pub team_id: Option<String>,
}

/// Body of `POST /tickets/{id}/message`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplyRequest {
    pub content: String,
}

/// Query string of the listing routes.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListParams {
    /// Comma-separated statuses.
    pub status: Option<String>,
    pub sort_priority: Option<String>,
    pub sort_date: Option<String>,
    pub priority_type: Option<String>,
}

impl ListParams {
    /// Validates the raw parameters into a listing query.
    pub fn into_query(self) -> Result<TicketListQuery, DeskError> {
        Ok(TicketListQuery {
            statuses: non_empty(self.status)
                .map(|s| s.parse::<StatusSet>())
                .transpose()?,
            sort_priority: parse_param("sortPriority", self.sort_priority)?,
            sort_date: parse_param("sortDate", self.sort_date)?,
            priority: parse_param("priorityType", self.priority_type)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_param<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, DeskError> {
    non_empty(value)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| DeskError::Validation(format!("invalid {name} value `{v}`")))
        })
        .transpose()
}

/// Fails with Forbidden unless `caller` may see `ticket`.
pub(crate) async fn authorize_ticket(
    state: &AppState,
    caller: &Caller,
    ticket: &Ticket,
) -> Result<(), DeskError> {
    let allowed = match caller.role {
        UserRole::Admin => true,
        UserRole::User => ticket.user_id == caller.user_id,
        UserRole::Supporter => {
            let supporter = state
                .service
                .store()
                .get_supporter_by_user(&caller.user_id)
                .await?;
            matches!(
                (supporter.and_then(|s| s.team_id), &ticket.team_id),
                (Some(mine), Some(theirs)) if &mine == theirs
            )
        }
    };
    if allowed {
        Ok(())
    } else {
        Err(DeskError::Forbidden(
            "ticket belongs to another user or team".to_string(),
        ))
    }
}

async fn visible_ticket(state: &AppState, caller: &Caller, ticket_id: &str) -> Result<Ticket, DeskError> {
    let ticket = state.service.get_ticket(ticket_id).await?;
    authorize_ticket(state, caller, &ticket).await?;
    Ok(ticket)
}

/// POST /tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateTicketRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Ticket>>)> {
    let ticket = state
        .service
        .create_ticket(NewTicket {
            priority: body.ticket_priority,
            content: body.ticket_content,
            tone: body.ticket_tone,
            difficulty: body.ticket_difficulty,
            team_id: body.team_id,
            requester_id: caller.user_id,
        })
        .await?;
    Ok(created(ticket, "Ticket created"))
}

/// GET /tickets: the caller's own tickets, or every ticket for administrators.
pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<Ticket>>>)> {
    let query = params.into_query()?;
    let scope = if caller.is_admin() {
        QueueScope::All
    } else {
        QueueScope::Requester(caller.user_id)
    };
    let tickets = state.service.list_by_status(&query, &scope).await?;
    Ok(ok(tickets))
}

/// GET /supporter/tickets: the caller's team queue.
pub async fn supporter_queue(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<Ticket>>>)> {
    let query = params.into_query()?;
    let tickets = state
        .service
        .list_by_status(&query, &QueueScope::Supporter(caller.user_id))
        .await?;
    Ok(ok(tickets))
}

/// GET /tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(ticket_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TicketWithMessages>>)> {
    visible_ticket(&state, &caller, &ticket_id).await?;
    let full = state.service.get_with_transcript(&ticket_id).await?;
    Ok(ok(full))
}

/// PUT /tickets/{id}
pub async fn update_ticket(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(ticket_id): Path<String>,
    ApiJson(patch): ApiJson<TicketPatch>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Ticket>>)> {
    visible_ticket(&state, &caller, &ticket_id).await?;
    let ticket = state.service.update_ticket(&ticket_id, patch).await?;
    Ok(ok(ticket))
}

/// DELETE /tickets/{id} (administrators only)
pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    if !caller.is_admin() {
        return Err(DeskError::Forbidden("administrator role required".to_string()).into());
    }
    state.service.delete_ticket(&ticket_id).await?;
    Ok(Json(ApiResponse::message("Ticket deleted")))
}

/// POST /tickets/{id}/message
///
/// Users reply as `user`; supporters and administrators as `supporter`.
pub async fn reply(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(ticket_id): Path<String>,
    ApiJson(body): ApiJson<ReplyRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TicketMessage>>)> {
    visible_ticket(&state, &caller, &ticket_id).await?;
    let sender = match caller.role {
        UserRole::User => SenderType::User,
        UserRole::Supporter | UserRole::Admin => SenderType::Supporter,
    };
    let message = state.service.reply(&ticket_id, sender, &body.content).await?;
    Ok(created(message, "Message sent"))
}
