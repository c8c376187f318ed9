// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `supportdesk serve` command implementation.
//!
//! Opens SQLite storage, builds the Gemini-backed assistants and the ticket
//! service, then serves the HTTP API until a shutdown signal arrives.
//! Pending background ticket jobs are drained before the store closes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use supportdesk_config::DeskConfig;
use supportdesk_core::{DeskError, PluginAdapter};
use supportdesk_gateway::{AppState, AuthConfig, ServerConfig, start_server};
use supportdesk_gemini::GeminiProvider;
use supportdesk_storage::SqliteStore;
use supportdesk_triage::{AssistantModels, Assistants, LlmAssistant, TicketService};

use crate::shutdown;

/// Runs the `supportdesk serve` command.
pub async fn run_serve(config: DeskConfig) -> Result<(), DeskError> {
    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "starting supportdesk serve");

    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    info!(path = %config.storage.database_path, "storage opened");

    let provider = Arc::new(GeminiProvider::new(&config.gemini)?);
    let assistant = Arc::new(LlmAssistant::new(
        provider,
        AssistantModels::from(&config.gemini),
    ));
    let service = TicketService::new(
        store.clone(),
        Assistants::uniform(assistant),
        config.triage.clone(),
    );
    if !config.triage.enabled {
        warn!("background triage disabled, new tickets stay unclassified");
    }
    if config.auth.admin_token.is_none() {
        warn!("no auth.admin_token configured, administration routes are unreachable");
    }

    let state = AppState::new(service.clone(), AuthConfig::from(&config.auth));
    let cancel = shutdown::install_signal_handler();

    let served = start_server(&ServerConfig::from(&config.server), state, cancel.clone()).await;
    // A bind failure returns before any signal; make sure nothing waits on it.
    cancel.cancel();

    let drain = Duration::from_secs(config.triage.drain_timeout_secs);
    if !service.shutdown(drain).await {
        warn!(
            timeout_secs = config.triage.drain_timeout_secs,
            "background ticket jobs still running at shutdown"
        );
    }
    store.shutdown().await?;

    served?;
    info!("supportdesk stopped");
    Ok(())
}

/// Workspace crates that log at the configured level; everything else at `warn`.
const LOG_TARGETS: &[&str] = &[
    "supportdesk",
    "supportdesk_config",
    "supportdesk_storage",
    "supportdesk_gemini",
    "supportdesk_triage",
    "supportdesk_gateway",
    "tower_http",
];

fn default_filter(log_level: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG`, when set, replaces the configured level entirely.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_workspace_crates() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("supportdesk=debug,"));
        assert!(filter.contains("supportdesk_triage=debug"));
        assert!(filter.ends_with(",warn"));
    }
}
