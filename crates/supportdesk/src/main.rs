// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supportdesk - customer-support ticketing backend.
//!
//! This is the binary entry point for the supportdesk server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use supportdesk_config::DeskConfig;

/// Supportdesk - customer-support ticketing backend with LLM triage.
#[derive(Parser, Debug)]
#[command(name = "supportdesk", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
}

fn load_config(path: Option<&std::path::Path>) -> DeskConfig {
    let loaded = match path {
        Some(path) => supportdesk_config::load_and_validate_path(path),
        None => supportdesk_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            supportdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn print_config(config: &DeskConfig) -> Result<(), toml::ser::Error> {
    let rendered = toml::to_string_pretty(&config.redacted())?;
    print!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            if let Err(e) = print_config(&config) {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("supportdesk: use --help for available commands");
        }
    }
}
