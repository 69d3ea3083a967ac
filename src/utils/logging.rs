//! Diagnostic logging through `tracing`.
//!
//! The interactive page owns the terminal, so its diagnostics only go to a
//! file. Non-interactive subcommands may log to stderr.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "stephen_wolf=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
    Disabled,
}

impl LogDestination {
    /// A log file from the command line wins over one from the config file.
    /// Without either, interactive runs log nowhere.
    pub fn resolve(cli: Option<&Path>, config: Option<&Path>, interactive: bool) -> Self {
        match cli.or(config) {
            Some(path) => LogDestination::File(path.to_path_buf()),
            None if interactive => LogDestination::Disabled,
            None => LogDestination::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Calling it twice is an error.
pub fn init_tracing(destination: &LogDestination) -> Result<(), Box<dyn std::error::Error>> {
    match destination {
        LogDestination::Disabled => {}
        LogDestination::Stderr => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err as Box<dyn std::error::Error>)?,
        LogDestination::File(path) => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init()
            .map_err(|err| err as Box<dyn std::error::Error>)?,
    }
    Ok(())
}
