use std::path::{Path, PathBuf};

use super::usage;
use crate::commands::{CommandContext, CommandInvocation, CommandResult};
use crate::core::export::ExportError;
use crate::core::session::SaveOutcome;
use crate::ui::page::Notice;

const USAGE_EXPORT: &str = "/export [dir]";

pub(crate) fn handle_clear(
    context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    context.controller.clear();
    CommandResult::Notice(Notice::info("Conversation cleared"))
}

pub(crate) fn handle_save(
    context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Notice(save_notice(context.controller.save()))
}

pub fn save_notice(outcome: SaveOutcome) -> Notice {
    match outcome {
        SaveOutcome::Saved { .. } => Notice::success("Saved"),
        SaveOutcome::NothingToSave => Notice::info("Nothing to save"),
    }
}

pub(crate) fn handle_export(
    context: &mut CommandContext<'_>,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args.split_whitespace().count() > 1 {
        return usage(USAGE_EXPORT);
    }
    let dir = if invocation.has_args() {
        Path::new(invocation.args)
    } else {
        context.export_dir
    };
    CommandResult::Notice(export_notice(context.controller.export_to_dir(dir)))
}

pub fn export_notice(result: Result<PathBuf, ExportError>) -> Notice {
    match result {
        Ok(path) => Notice::success(format!("Exported to {}", path.display())),
        Err(ExportError::Empty) => Notice::info("Nothing to export"),
        Err(err) => Notice::error(format!("Export failed: {err}")),
    }
}

pub(crate) fn handle_sessions(
    context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let saved = context.controller.session().saved_sessions();
    let Some(latest) = saved.last() else {
        return CommandResult::Notice(Notice::info("No saved sessions"));
    };

    let noun = if saved.len() == 1 { "session" } else { "sessions" };
    CommandResult::Notice(Notice::info(format!(
        "{} saved {noun}; latest: {} / {}, {} messages at {}",
        saved.len(),
        latest.persona_name,
        latest.model_name,
        latest.messages.len(),
        latest.timestamp.format("%H:%M:%S"),
    )))
}
