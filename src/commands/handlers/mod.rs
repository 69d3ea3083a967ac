pub(super) mod selection;
pub(super) mod session;

use super::{all_commands, CommandContext, CommandInvocation, CommandResult};
use crate::ui::page::Notice;

pub(super) fn usage(usage: &str) -> CommandResult {
    CommandResult::Notice(Notice::warning(format!("Usage: {usage}")))
}

pub(super) fn handle_help(
    _context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let usages: Vec<&str> = all_commands().iter().map(|command| command.usage).collect();
    CommandResult::Notice(Notice::info(format!("Commands: {}", usages.join("  "))))
}

pub(super) fn handle_quit(
    _context: &mut CommandContext<'_>,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Quit
}
