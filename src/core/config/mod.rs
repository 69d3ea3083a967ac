//! User configuration stored as TOML in the platform config directory.

mod io;

pub use io::ConfigError;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// OpenAI-compatible endpoint of the hosted inference service.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Override for the chat-completions base URL
    pub base_url: Option<String>,
    /// Directory that `/export` writes into when no directory is given
    pub export_dir: Option<PathBuf>,
    /// Diagnostic log destination
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

pub(crate) fn path_display(path: &Path) -> String {
    path.display().to_string()
}
