//! JSON export of the live conversation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::core::message::Message;

const EXPORT_FILE_PREFIX: &str = "stephen_wolf_";
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export - the conversation is empty.")]
    Empty,
    #[error("Failed to serialize conversation: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Document written by an export: `{personality, model, messages, exported}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationExport {
    pub personality: String,
    pub model: String,
    pub messages: Vec<Message>,
    pub exported: DateTime<FixedOffset>,
}

impl ConversationExport {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `stephen_wolf_<YYYYMMDD_HHMMSS>.json`, stamped with the export time.
    pub fn file_name(&self) -> String {
        export_file_name(&self.exported)
    }

    /// Write the export into `dir` through a temporary file. An existing
    /// export with the same timestamp is never replaced; the new file gets a
    /// numeric suffix instead.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        if self.messages.is_empty() {
            return Err(ExportError::Empty);
        }

        let contents = self.to_json_pretty()?;
        let first_path = dir.join(self.file_name());
        let write_error = |path: &Path, source: io::Error| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(|err| write_error(&first_path, err))?;
        let mut temp_file =
            NamedTempFile::new_in(dir).map_err(|err| write_error(&first_path, err))?;
        temp_file
            .write_all(contents.as_bytes())
            .map_err(|err| write_error(&first_path, err))?;
        temp_file
            .as_file_mut()
            .sync_all()
            .map_err(|err| write_error(&first_path, err))?;

        let mut attempt = 0;
        loop {
            let path = if attempt == 0 {
                first_path.clone()
            } else {
                dir.join(suffixed_file_name(&self.exported, attempt))
            };
            match temp_file.persist_noclobber(&path) {
                Ok(_) => return Ok(path),
                Err(err)
                    if err.error.kind() == io::ErrorKind::AlreadyExists
                        && attempt < MAX_NAME_ATTEMPTS =>
                {
                    temp_file = err.file;
                    attempt += 1;
                }
                Err(err) => return Err(write_error(&path, err.error)),
            }
        }
    }
}

pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{EXPORT_FILE_PREFIX}{}.json", at.format("%Y%m%d_%H%M%S"))
}

fn suffixed_file_name<Tz: TimeZone>(at: &DateTime<Tz>, attempt: u32) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{EXPORT_FILE_PREFIX}{}_{attempt}.json",
        at.format("%Y%m%d_%H%M%S")
    )
}
