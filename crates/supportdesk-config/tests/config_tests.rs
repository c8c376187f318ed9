// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the supportdesk configuration system.

use supportdesk_config::diagnostic::ConfigError;
use supportdesk_config::model::DeskConfig;
use supportdesk_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with every section deserializes successfully.
#[test]
fn valid_toml_deserializes_into_desk_config() {
    let toml = r#"
[service]
name = "desk-test"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9000

[storage]
database_path = "/tmp/desk.db"
wal_mode = false

[gemini]
api_key = "AIza-test"
classify_model = "gemini-2.0-flash"
timeout_secs = 15

[triage]
enabled = false
match_confidence_threshold = 0.9
drain_timeout_secs = 3

[auth]
admin_token = "root"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "desk-test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.storage.database_path, "/tmp/desk.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
    assert_eq!(config.gemini.classify_model, "gemini-2.0-flash");
    assert_eq!(config.gemini.match_model, "gemini-2.5-flash");
    assert_eq!(config.gemini.timeout_secs, 15);
    assert!(!config.triage.enabled);
    assert_eq!(config.triage.drain_timeout_secs, 3);
    assert_eq!(config.auth.admin_token.as_deref(), Some("root"));
}

/// An empty document yields the compiled defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "supportdesk");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.server.port, 8000);
    assert!(config.storage.wal_mode);
    assert!(config.gemini.api_key.is_none());
    assert_eq!(
        config.gemini.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert!(config.triage.enabled);
    assert!(config.auth.admin_token.is_none());
}

/// Dotted keys (what the env provider produces) override file values.
#[test]
fn dotted_override_beats_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: DeskConfig = Figment::new()
        .merge(Serialized::defaults(DeskConfig::default()))
        .merge(Toml::string("[gemini]\napi_key = \"from-toml\"\n"))
        .merge(("gemini.api_key", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[logging]\nlevel = \"debug\"\n")
        .expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key produces an UnknownKey diagnostic with a suggestion and valid keys.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[server]
prot = 9000
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "prot"
                && suggestion.as_deref() == Some("port")
                && valid_keys.contains("host")
        })
    });
    assert!(found, "expected UnknownKey for `prot`, got: {errors:?}");
}

/// String where a number is expected produces a type error.
#[test]
fn invalid_type_is_reported() {
    let err = load_config_from_str("[server]\nport = \"eighty\"\n")
        .expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("port"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_catches_threshold_out_of_range() {
    let errors = load_and_validate_str("[triage]\nmatch_confidence_threshold = -0.1\n")
        .expect_err("negative threshold should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("match_confidence_threshold"))
    }));
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "prot".to_string(),
        suggestion: Some("port".to_string()),
        valid_keys: "host, port".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help").to_string();
    assert!(help.contains("did you mean `port`"));

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("prot"));
}

/// An explicit config file is read and validated.
#[test]
fn load_and_validate_from_file() {
    let dir = std::env::temp_dir().join(format!("supportdesk-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("supportdesk.toml");
    std::fs::write(&path, "[server]\nport = 8123\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should validate");
    assert_eq!(config.server.port, 8123);

    std::fs::remove_dir_all(&dir).ok();
}

/// A mistyped value in a config file is underlined in that file.
#[test]
fn invalid_type_in_file_points_at_key() {
    let dir = std::env::temp_dir().join(format!("supportdesk-badtype-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("supportdesk.toml");
    let content = "[triage]\nenabled = true\n\n[server]\nport = \"eighty\"\n";
    std::fs::write(&path, content).unwrap();

    let errors = load_and_validate_path(&path).expect_err("string port should be rejected");
    let offset = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::InvalidType { key, span, .. } if key.ends_with("port") => *span,
            _ => None,
        })
        .expect("InvalidType with a span for server.port")
        .offset();
    assert_eq!(&content[offset..offset + 4], "port");
    assert!(content[..offset].ends_with("[server]\n"));

    std::fs::remove_dir_all(&dir).ok();
}
