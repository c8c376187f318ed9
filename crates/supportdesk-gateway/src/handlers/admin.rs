// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administration routes for teams, users, and supporter profiles.
//!
//! Mounted behind [`require_admin`](crate::auth::require_admin).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use supportdesk_core::types::{new_id, now_timestamp};
use supportdesk_core::{DeskError, Supporter, Team, User, UserRole};

use crate::auth::{generate_token, hash_token};
use crate::envelope::{ApiJson, ApiResponse, ApiResult, created, ok};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTeamRequest {
    pub team_name: String,
    pub team_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_role")]
    pub user_type: UserRole,
}

fn default_role() -> UserRole {
    UserRole::User
}

/// Returned once on user creation; the token is not stored in clear.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    #[serde(flatten)]
    pub user: User,
    pub api_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSupporterRequest {
    pub user_id: String,
    pub team_id: Option<String>,
    pub supporter_name: String,
}

fn required(field: &str, value: &str) -> Result<String, DeskError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DeskError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn deleted_or_not_found(
    deleted: bool,
    entity: &'static str,
    id: &str,
) -> ApiResult<Json<ApiResponse<()>>> {
    if !deleted {
        return Err(DeskError::not_found(entity, id).into());
    }
    Ok(Json(ApiResponse::message(format!("{entity} deleted"))))
}

// --- Teams ---

/// GET /admin/teams
pub async fn list_teams(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<Team>>>)> {
    Ok(ok(state.service.store().list_teams().await?))
}

/// POST /admin/teams
pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Team>>)> {
    let team = Team {
        team_id: new_id(),
        team_name: required("team_name", &body.team_name)?,
        team_description: body.team_description.filter(|d| !d.trim().is_empty()),
        created_at: now_timestamp(),
    };
    state.service.store().insert_team(&team).await?;
    info!(team_id = %team.team_id, "team created");
    Ok(created(team, "Team created"))
}

/// GET /admin/teams/{id}
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Team>>)> {
    let team = state
        .service
        .store()
        .get_team(&team_id)
        .await?
        .ok_or_else(|| DeskError::not_found("team", team_id.as_str()))?;
    Ok(ok(team))
}

/// DELETE /admin/teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let deleted = state.service.store().delete_team(&team_id).await?;
    deleted_or_not_found(deleted, "team", &team_id)
}

// --- Users ---

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<User>>>)> {
    Ok(ok(state.service.store().list_users().await?))
}

/// POST /admin/users: returns the new API token exactly once.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreatedUser>>)> {
    let user = User {
        user_id: new_id(),
        user_name: required("user_name", &body.user_name)?,
        user_type: body.user_type,
        created_at: now_timestamp(),
    };
    let api_token = generate_token();
    state
        .service
        .store()
        .insert_user(&user, &hash_token(&api_token))
        .await?;
    info!(user_id = %user.user_id, role = %user.user_type, "user created");
    Ok(created(CreatedUser { user, api_token }, "User created"))
}

/// GET /admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state
        .service
        .store()
        .get_user(&user_id)
        .await?
        .ok_or_else(|| DeskError::not_found("user", user_id.as_str()))?;
    Ok(ok(user))
}

/// DELETE /admin/users/{id}: also removes the user's tickets.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let deleted = state.service.store().delete_user(&user_id).await?;
    deleted_or_not_found(deleted, "user", &user_id)
}

// --- Supporters ---

/// GET /admin/supporters
pub async fn list_supporters(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<Supporter>>>)> {
    Ok(ok(state.service.store().list_supporters().await?))
}

/// POST /admin/supporters
pub async fn create_supporter(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateSupporterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Supporter>>)> {
    let store = state.service.store();
    let user_id = required("user_id", &body.user_id)?;
    if store.get_user(&user_id).await?.is_none() {
        return Err(DeskError::Validation(format!("user `{user_id}` does not exist")).into());
    }
    let team_id = body.team_id.filter(|t| !t.trim().is_empty());
    if let Some(team_id) = &team_id
        && store.get_team(team_id).await?.is_none()
    {
        return Err(DeskError::Validation(format!("team `{team_id}` does not exist")).into());
    }

    let supporter = Supporter {
        supporter_id: new_id(),
        user_id,
        team_id,
        supporter_name: required("supporter_name", &body.supporter_name)?,
        created_at: now_timestamp(),
    };
    store.insert_supporter(&supporter).await?;
    info!(supporter_id = %supporter.supporter_id, "supporter created");
    Ok(created(supporter, "Supporter created"))
}

/// GET /admin/supporters/{id}
pub async fn get_supporter(
    State(state): State<AppState>,
    Path(supporter_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Supporter>>)> {
    let supporter = state
        .service
        .store()
        .get_supporter(&supporter_id)
        .await?
        .ok_or_else(|| DeskError::not_found("supporter", supporter_id.as_str()))?;
    Ok(ok(supporter))
}

/// DELETE /admin/supporters/{id}
pub async fn delete_supporter(
    State(state): State<AppState>,
    Path(supporter_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let deleted = state.service.store().delete_supporter(&supporter_id).await?;
    deleted_or_not_found(deleted, "supporter", &supporter_id)
}
