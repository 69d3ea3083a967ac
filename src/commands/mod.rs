//! Slash commands typed into the chat input.

mod handlers;
mod registry;

pub use handlers::session::{export_notice, save_notice};
pub use registry::{all_commands, find_command, Command, CommandInvocation};

use std::path::Path;

use crate::core::controller::ConversationController;
use crate::ui::page::Notice;

pub enum CommandResult {
    /// Handled; show this notice in the status line.
    Notice(Notice),
    /// Not a command; submit the text as a chat message.
    ProcessAsMessage(String),
    Quit,
}

pub struct CommandContext<'a> {
    pub controller: &'a mut ConversationController,
    pub export_dir: &'a Path,
}

pub fn process_input(context: &mut CommandContext<'_>, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match registry::find_command(command_name) {
        Some(command) => {
            (command.handler)(context, CommandInvocation { args })
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}
