use super::CommandResult;
use crate::core::session::ChatSession;

pub type CommandHandler = fn(&mut ChatSession, CommandInvocation<'_>) -> CommandResult;

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
    pub fn arg_parts(&self) -> Vec<&str> {
        self.args.split_whitespace().collect()
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
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new conversation and switch to it.",
        handler: super::handle_new,
    },
    Command {
        name: "list",
        usage: "/list",
        help: "List conversations; * marks the active one.",
        handler: super::handle_list,
    },
    Command {
        name: "select",
        usage: "/select N",
        help: "Switch to conversation N from /list.",
        handler: super::handle_select,
    },
    Command {
        name: "delete",
        usage: "/delete N",
        help: "Delete conversation N from /list.",
        handler: super::handle_delete,
    },
    Command {
        name: "provider",
        usage: "/provider [NAME]",
        help: "Show providers or switch to NAME.",
        handler: super::handle_provider,
    },
    Command {
        name: "attach",
        usage: "/attach file|image|audio VALUE",
        help: "Attach a file or image by name, or an audio recording by seconds, to the next message.",
        handler: super::handle_attach,
    },
    Command {
        name: "clear-attachments",
        usage: "/clear-attachments",
        help: "Drop attachments that have not been sent yet.",
        handler: super::handle_clear_attachments,
    },
    Command {
        name: "dismiss",
        usage: "/dismiss",
        help: "Hide the current error message.",
        handler: super::handle_dismiss,
    },
    Command {
        name: "log",
        usage: "/log [FILE]",
        help: "Log the transcript to FILE, or pause/resume logging.",
        handler: super::handle_log,
    },
    Command {
        name: "dump",
        usage: "/dump [FILE]",
        help: "Write the active conversation to FILE.",
        handler: super::handle_dump,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the session.",
        handler: super::handle_quit,
    },
];
