// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the supportdesk REST API.
//!
//! Every response uses the JSON envelope from [`envelope`]. Authentication
//! is a bearer token resolved by [`auth::auth_middleware`]; handlers call
//! into [`supportdesk_triage::TicketService`].

pub mod auth;
pub mod envelope;
pub mod handlers;
pub mod server;

pub use auth::{AuthConfig, Caller};
pub use envelope::{ApiError, ApiResponse};
pub use server::{AppState, ServerConfig, build_router, start_server};
