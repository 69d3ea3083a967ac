use super::{CommandContext, CommandResult};

pub type CommandHandler = fn(&mut CommandContext<'_>, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

impl CommandInvocation<'_> {
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "List available commands.",
        handler: super::handlers::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Clear the current conversation.",
        handler: super::handlers::session::handle_clear,
    },
    Command {
        name: "save",
        usage: "/save",
        help: "Save a snapshot of the conversation to this session's log.",
        handler: super::handlers::session::handle_save,
    },
    Command {
        name: "export",
        usage: "/export [dir]",
        help: "Export the conversation as JSON.",
        handler: super::handlers::session::handle_export,
    },
    Command {
        name: "sessions",
        usage: "/sessions",
        help: "Summarize saved sessions.",
        handler: super::handlers::session::handle_sessions,
    },
    Command {
        name: "persona",
        usage: "/persona <name>",
        help: "Switch persona (clears the conversation).",
        handler: super::handlers::selection::handle_persona,
    },
    Command {
        name: "model",
        usage: "/model <name>",
        help: "Switch model (clears the conversation).",
        handler: super::handlers::selection::handle_model,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handlers::handle_quit,
    },
];
