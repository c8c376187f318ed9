// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./supportdesk.toml` >
//! `~/.config/supportdesk/supportdesk.toml` > `/etc/supportdesk/supportdesk.toml`
//! with environment variable overrides via the `SUPPORTDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DeskConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/supportdesk/supportdesk.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "supportdesk.toml";

/// Top-level sections, used to map `SUPPORTDESK_<SECTION>_<KEY>` to `section.key`.
const SECTIONS: &[&str] = &["service", "server", "storage", "gemini", "triage", "auth"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/supportdesk/supportdesk.toml` (system-wide)
/// 3. `~/.config/supportdesk/supportdesk.toml` (user XDG config)
/// 4. `./supportdesk.toml` (local directory)
/// 5. `SUPPORTDESK_*` environment variables
pub fn load_config() -> Result<DeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string on top of the defaults only.
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/supportdesk/supportdesk.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("supportdesk").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider.
///
/// Uses an explicit section map instead of `Env::split("_")` so that
/// `SUPPORTDESK_GEMINI_API_KEY` becomes `gemini.api_key`, not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("SUPPORTDESK_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("gemini_api_key"), "gemini.api_key");
        assert_eq!(
            map_env_key("triage_match_confidence_threshold"),
            "triage.match_confidence_threshold"
        );
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("auth_admin_token"), "auth.admin_token");
    }

    #[test]
    fn unknown_env_keys_pass_through() {
        assert_eq!(map_env_key("unrelated"), "unrelated");
        assert_eq!(map_env_key("servers_port"), "servers_port");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config_from_path(Path::new("/nonexistent/supportdesk.toml"))
            .expect("missing file should be skipped");
        assert_eq!(config.service.name, "supportdesk");
    }
}
