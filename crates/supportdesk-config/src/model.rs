// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the supportdesk backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder written in place of secrets when printing configuration.
pub const REDACTED: &str = "[REDACTED]";

/// Top-level supportdesk configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeskConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gemini API settings used by the assistants.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Background triage settings.
    #[serde(default)]
    pub triage: TriageConfig,

    /// API authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl DeskConfig {
    /// Returns a copy with every secret replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.gemini.api_key.is_some() {
            copy.gemini.api_key = Some(REDACTED.to_string());
        }
        if copy.auth.admin_token.is_some() {
            copy.auth.admin_token = Some(REDACTED.to_string());
        }
        copy
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Service name used in logs and the health endpoint.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "supportdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("supportdesk").join("supportdesk.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("supportdesk.db"))
        .to_string_lossy()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Gemini API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL, without the `/v1beta` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for ticket classification.
    #[serde(default = "default_light_model")]
    pub classify_model: String,

    /// Model used for knowledge-base matching.
    #[serde(default = "default_match_model")]
    pub match_model: String,

    /// Model used for auto-responses to easy tickets.
    #[serde(default = "default_light_model")]
    pub respond_model: String,

    /// Model used for resolution summaries.
    #[serde(default = "default_light_model")]
    pub summarize_model: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            classify_model: default_light_model(),
            match_model: default_match_model(),
            respond_model: default_light_model(),
            summarize_model: default_light_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("base_url", &self.base_url)
            .field("classify_model", &self.classify_model)
            .field("match_model", &self.match_model)
            .field("respond_model", &self.respond_model)
            .field("summarize_model", &self.summarize_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_light_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_match_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Background triage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TriageConfig {
    /// Run classification after ticket creation. When false tickets stay `open`.
    #[serde(default = "default_triage_enabled")]
    pub enabled: bool,

    /// A knowledge-base match must score strictly above this to auto-resolve.
    #[serde(default = "default_match_confidence_threshold")]
    pub match_confidence_threshold: f64,

    /// Seconds to wait for queued background work on shutdown.
    #[serde(default = "default_drain_timeout_secs")]
    pub drain_timeout_secs: u64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            enabled: default_triage_enabled(),
            match_confidence_threshold: default_match_confidence_threshold(),
            drain_timeout_secs: default_drain_timeout_secs(),
        }
    }
}

fn default_triage_enabled() -> bool {
    true
}

fn default_match_confidence_threshold() -> f64 {
    0.8
}

fn default_drain_timeout_secs() -> u64 {
    10
}

/// API authentication configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Bootstrap administrator bearer token. `None` disables the admin token.
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_token", &self.admin_token.as_ref().map(|_| REDACTED))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = DeskConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.gemini.classify_model, "gemini-2.5-flash-lite");
        assert_eq!(config.gemini.match_model, "gemini-2.5-flash");
        assert!(config.triage.enabled);
        assert!((config.triage.match_confidence_threshold - 0.8).abs() < f64::EPSILON);
        assert!(config.storage.database_path.ends_with("supportdesk.db"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = DeskConfig::default();
        config.gemini.api_key = Some("AIza-secret".into());
        config.auth.admin_token = Some("root-token".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(!debug.contains("root-token"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn redacted_copy_hides_secrets_but_keeps_absence() {
        let mut config = DeskConfig::default();
        config.auth.admin_token = Some("root-token".into());
        let redacted = config.redacted();
        assert_eq!(redacted.auth.admin_token.as_deref(), Some(REDACTED));
        assert!(redacted.gemini.api_key.is_none());
        assert_eq!(config.auth.admin_token.as_deref(), Some("root-token"));
    }

    #[test]
    fn serializes_to_toml() {
        let rendered = toml::to_string(&DeskConfig::default().redacted()).unwrap();
        assert!(rendered.contains("[triage]"));
        assert!(rendered.contains("match_confidence_threshold"));
    }
}
