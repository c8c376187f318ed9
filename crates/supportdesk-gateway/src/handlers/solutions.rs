// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base routes. Reads are open to any caller; writes need the
//! supporter or administrator role.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use supportdesk_core::{DeskError, Solution};

use crate::auth::Caller;
use crate::envelope::{ApiJson, ApiResponse, ApiResult, created, ok};
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SolutionFilter {
    pub team_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSolutionRequest {
    pub team_id: String,
    pub problem: String,
    pub solution: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSolutionRequest {
    pub problem: String,
    pub solution: String,
}

fn require_writer(caller: &Caller) -> Result<(), DeskError> {
    if caller.role == supportdesk_core::UserRole::User {
        return Err(DeskError::Forbidden(
            "supporter or administrator role required".to_string(),
        ));
    }
    Ok(())
}

/// GET /solutions[?team_id=]
pub async fn list_solutions(
    State(state): State<AppState>,
    Query(filter): Query<SolutionFilter>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<Solution>>>)> {
    let team_id = filter.team_id.as_deref().filter(|t| !t.is_empty());
    Ok(ok(state.service.list_solutions(team_id).await?))
}

/// GET /solutions/{id}
pub async fn get_solution(
    State(state): State<AppState>,
    Path(solution_id): Path<String>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Solution>>)> {
    Ok(ok(state.service.get_solution(&solution_id).await?))
}

/// POST /solutions
pub async fn create_solution(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    ApiJson(body): ApiJson<CreateSolutionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Solution>>)> {
    require_writer(&caller)?;
    let solution = state
        .service
        .create_solution(&body.team_id, &body.problem, &body.solution)
        .await?;
    Ok(created(solution, "Solution created"))
}

/// PUT /solutions/{id}
pub async fn update_solution(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(solution_id): Path<String>,
    ApiJson(body): ApiJson<UpdateSolutionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Solution>>)> {
    require_writer(&caller)?;
    let solution = state
        .service
        .update_solution(&solution_id, &body.problem, &body.solution)
        .await?;
    Ok(ok(solution))
}

/// DELETE /solutions/{id}
pub async fn delete_solution(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(solution_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    require_writer(&caller)?;
    state.service.delete_solution(&solution_id).await?;
    Ok(Json(ApiResponse::message("Solution deleted")))
}
