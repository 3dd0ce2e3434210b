//! Charter CLI - binary entry point.
//!
//! Every invocation is one wizard session:
//!
//! ```text
//! main() -> Wizard::bootstrap() -> grace period -> tick() -> commands::run()
//! ```
//!
//! State lives in the data directory between invocations, so a sequence of
//! commands walks through the registration one step at a time.

mod commands;
mod render;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tokio::time;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use charter_config::{CharterConfig, charter_home};
use charter_engine::{EntryParams, FileStore, Wizard};

use crate::commands::Command;

#[derive(Debug, Parser)]
#[command(name = "charter")]
#[command(version)]
#[command(about = "Step-by-step company registration", long_about = None)]
struct Cli {
    /// Entry parameters, query-string style (e.g. "reset=true&debug=1")
    #[arg(long, global = true, value_name = "QUERY")]
    entry: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than mix logs into command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => warnings.push(format!(
                "Failed to open log file {}: {e}",
                candidate.display()
            )),
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.charter/logs/charter.log
    if let Some(home) = charter_home() {
        candidates.push(home.join("logs").join("charter.log"));
    }

    // Fallback: ./.charter/logs/charter.log
    candidates.push(PathBuf::from(".charter").join("logs").join("charter.log"));

    candidates
}

fn data_dir(config: &CharterConfig) -> PathBuf {
    config.data_dir().unwrap_or_else(|| {
        tracing::warn!("No home directory; storing data under ./.charter/data");
        PathBuf::from(".charter").join("data")
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = match CharterConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: {e}; using defaults");
            CharterConfig::default()
        }
    };

    let entry = EntryParams::parse(cli.entry.as_deref().unwrap_or_default());
    let grace = config.grace_period();
    let store = FileStore::new(data_dir(&config));
    let (mut wizard, restore) = Wizard::bootstrap(store, &entry, grace, Instant::now());
    tracing::debug!(?restore, "Session started");

    time::sleep(grace).await;
    wizard.tick(Instant::now());

    let output = commands::run(&mut wizard, cli.command.unwrap_or(Command::Status))?;
    print!("{output}");
    Ok(())
}
