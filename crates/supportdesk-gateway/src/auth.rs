// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Callers send `Authorization: Bearer <token>`. The configured admin token
//! authenticates as an administrator; any other token is hashed with
//! SHA-256 and looked up among stored user tokens. The resolved [`Caller`]
//! is inserted into request extensions for handlers.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use supportdesk_core::{DeskError, UserRole};

use crate::envelope::ApiError;
use crate::server::AppState;

/// User id recorded for requests made with the admin token.
pub const ADMIN_USER_ID: &str = "admin";

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Bootstrap administrator token. `None` disables admin-token login.
    pub admin_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_token", &self.admin_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl From<&supportdesk_config::model::AuthConfig> for AuthConfig {
    fn from(config: &supportdesk_config::model::AuthConfig) -> Self {
        Self {
            admin_token: config.admin_token.clone(),
        }
    }
}

/// The authenticated identity of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: UserRole,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Hex-encoded SHA-256 of an API token, as stored.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// A fresh random API token (64 hex chars).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn resolve_caller(state: &AppState, token: &str) -> Result<Caller, DeskError> {
    if let Some(admin_token) = &state.auth.admin_token
        && token == admin_token
    {
        return Ok(Caller {
            user_id: ADMIN_USER_ID.to_string(),
            role: UserRole::Admin,
        });
    }

    let user = state
        .service
        .store()
        .find_user_by_token_hash(&hash_token(token))
        .await?
        .ok_or_else(|| DeskError::Unauthorized("invalid token".to_string()))?;
    Ok(Caller {
        user_id: user.user_id,
        role: user.user_type,
    })
}

/// Middleware that resolves the bearer token into a [`Caller`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| DeskError::Unauthorized("missing bearer token".to_string()))?
        .to_string();
    let caller = resolve_caller(&state, &token).await?;
    tracing::debug!(user_id = %caller.user_id, role = %caller.role, "request authenticated");
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Middleware for administrator-only routes. Must run after [`auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<Caller>() {
        Some(caller) if caller.is_admin() => Ok(next.run(request).await),
        Some(_) => Err(DeskError::Forbidden("administrator role required".to_string()).into()),
        None => Err(DeskError::Unauthorized("missing bearer token".to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_hex_sha256() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn auth_config_debug_redacts_token() {
        let config = AuthConfig {
            admin_token: Some("secret-token".to_string()),
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[redacted]"));
    }
}
