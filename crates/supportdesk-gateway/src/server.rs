// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the REST API.

use std::time::Instant;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use supportdesk_core::DeskError;
use supportdesk_triage::TicketService;

use crate::auth::{AuthConfig, auth_middleware, require_admin};
use crate::handlers::{self, admin, solutions, tickets};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ticket operations and the store behind them.
    pub service: TicketService,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: TicketService, auth: AuthConfig) -> Self {
        Self {
            service,
            auth,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind. 0 picks a free port.
    pub port: u16,
}

impl From<&supportdesk_config::model::ServerConfig> for ServerConfig {
    fn from(config: &supportdesk_config::model::ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// Builds the full application router.
///
/// - GET /health (public)
/// - /tickets, /supporter/tickets, /solutions (authenticated)
/// - /admin/* (authenticated, administrators only)
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/teams", get(admin::list_teams).post(admin::create_team))
        .route(
            "/admin/teams/{id}",
            get(admin::get_team).delete(admin::delete_team),
        )
        .route("/admin/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/admin/users/{id}",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route(
            "/admin/supporters",
            get(admin::list_supporters).post(admin::create_supporter),
        )
        .route(
            "/admin/supporters/{id}",
            get(admin::get_supporter).delete(admin::delete_supporter),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    let api_routes = Router::new()
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/tickets/{id}/message", post(tickets::reply))
        .route("/supporter/tickets", get(tickets::supporter_queue))
        .route(
            "/solutions",
            get(solutions::list_solutions).post(solutions::create_solution),
        )
        .route(
            "/solutions/{id}",
            get(solutions::get_solution)
                .put(solutions::update_solution)
                .delete(solutions::delete_solution),
        )
        .merge(admin_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback(handlers::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Binds and serves the API until `shutdown` is cancelled.
///
/// In-flight requests finish before this returns.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), DeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DeskError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| DeskError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
