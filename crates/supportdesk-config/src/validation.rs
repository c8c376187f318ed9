// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express: non-empty
//! addresses and paths, ranges for thresholds and timeouts.

use crate::diagnostic::ConfigError;
use crate::model::DeskConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must be between 1 and 65535".to_string());
    }

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        fail(format!(
            "service.log_level `{}` must be one of: {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.gemini.base_url.trim().is_empty() {
        fail("gemini.base_url must not be empty".to_string());
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be greater than 0".to_string());
    }

    for (key, model) in [
        ("classify_model", &config.gemini.classify_model),
        ("match_model", &config.gemini.match_model),
        ("respond_model", &config.gemini.respond_model),
        ("summarize_model", &config.gemini.summarize_model),
    ] {
        if model.trim().is_empty() {
            fail(format!("gemini.{key} must not be empty"));
        }
    }

    let threshold = config.triage.match_confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        fail(format!(
            "triage.match_confidence_threshold must be within [0, 1], got {threshold}"
        ));
    }

    if let Some(token) = &config.auth.admin_token
        && token.trim().is_empty()
    {
        fail("auth.admin_token must not be empty when set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&DeskConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = DeskConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn threshold_out_of_range_fails_validation() {
        let mut config = DeskConfig::default();
        config.triage.match_confidence_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "match_confidence_threshold"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = DeskConfig::default();
        config.server.port = 0;
        config.server.host = " ".to_string();
        config.gemini.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "server.port"));
        assert!(has_error(&errors, "server.host"));
        assert!(has_error(&errors, "timeout_secs"));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = DeskConfig::default();
        config.service.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "log_level"));
    }

    #[test]
    fn blank_admin_token_fails_validation() {
        let mut config = DeskConfig::default();
        config.auth.admin_token = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "admin_token"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = DeskConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 9090;
        config.storage.database_path = "/tmp/desk.db".to_string();
        config.triage.match_confidence_threshold = 0.9;
        assert!(validate_config(&config).is_ok());
    }
}
