// Daily Dock: an edge-docked desktop widget for a daily to-do list and theme image

pub mod autostart;
pub mod chat_export;
pub mod cli;
pub mod commands;
pub mod dialogs;
pub mod dock;
pub mod error;
pub mod images;
pub mod models;
pub mod storage;
pub mod task_store;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{execute_and_print, Cli};
use crate::dialogs::{DialogNotifier, LogNotifier, Notifier};
use crate::storage::AppPaths;

pub use error::{DockError, Result};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let notifier: Box<dyn Notifier> = if cli.dialogs {
        Box::new(DialogNotifier)
    } else {
        Box::new(LogNotifier)
    };

    let mut paths = AppPaths::resolve();
    if let Some(ref dir) = cli.data_dir {
        paths = paths.with_data_dir(dir);
    }

    let state = match storage::init_state(paths) {
        Ok(state) => state,
        Err(e) => {
            notifier.error("Daily Dock", &format!("Failed to initialize storage: {}", e));
            return ExitCode::FAILURE;
        }
    };

    if execute_and_print(&state, cli.command, notifier.as_ref()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
