mod registry;

pub use registry::{all_commands, find_command, CommandInvocation};

use std::path::Path;

use chrono::Local;

use crate::cli::provider_list::provider_lines;
use crate::core::message::Attachment;
use crate::core::providers::ProviderKind;
use crate::core::session::ChatSession;
use crate::utils::logging::dump_conversation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Quit,
}

/// Run `input` as a slash command. Text that is not a known command is
/// handed back to be sent as a message.
pub fn process_input(session: &mut ChatSession, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => {
            (command.handler)(session, CommandInvocation { args })
        }
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub(super) fn handle_help(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or_default();
    let mut help = String::from("Commands:");
    for command in all_commands() {
        help.push_str(&format!("\n  {:width$}  {}", command.usage, command.help));
    }
    help.push_str("\nAnything else is sent as a message.");
    session.notify(help);
    CommandResult::Continue
}

pub(super) fn handle_new(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    session.controller_mut().create_conversation();
    let index = session.controller().store().len();
    session.notify(format!("Started conversation {index}."));
    CommandResult::Continue
}

pub(super) fn handle_list(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let store = session.controller().store();
    if store.is_empty() {
        session.notify("No conversations. Type a message or /new to start one.");
        return CommandResult::Continue;
    }

    let active = store.active_id();
    let lines = store
        .conversations()
        .iter()
        .enumerate()
        .map(|(position, conversation)| {
            let marker = if Some(conversation.id()) == active { "*" } else { " " };
            let count = conversation.messages().len();
            format!(
                "{marker} {}. {} ({count} message{}, started {})",
                position + 1,
                conversation.title(),
                if count == 1 { "" } else { "s" },
                conversation.created_at().format("%H:%M"),
            )
        })
        .collect::<Vec<_>>();
    session.notify(lines.join("\n"));
    CommandResult::Continue
}

fn parse_position(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
    usage: &str,
) -> Option<usize> {
    match invocation.args.parse::<usize>() {
        Ok(position) => Some(position),
        Err(_) => {
            session.notify(format!("Usage: {usage}"));
            None
        }
    }
}

pub(super) fn handle_select(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let Some(position) = parse_position(session, invocation, "/select N") else {
        return CommandResult::Continue;
    };
    let selected = session
        .conversation_at(position)
        .map(|id| session.controller_mut().select_conversation(id));
    match selected {
        Some(Ok(())) => {
            let title = session
                .controller()
                .store()
                .active()
                .map(|conversation| conversation.title().to_string())
                .unwrap_or_default();
            session.notify(format!("Switched to {position}. {title}"));
        }
        Some(Err(err)) => session.notify(format!("Select error: {err}")),
        None => session.notify(format!("No conversation {position}. Use /list to see them.")),
    }
    CommandResult::Continue
}

pub(super) fn handle_delete(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let Some(position) = parse_position(session, invocation, "/delete N") else {
        return CommandResult::Continue;
    };
    let deleted = session
        .conversation_at(position)
        .map(|id| session.controller_mut().delete_conversation(id));
    match deleted {
        Some(Ok(())) => session.notify(format!("Deleted conversation {position}.")),
        Some(Err(err)) => session.notify(format!("Delete error: {err}")),
        None => session.notify(format!("No conversation {position}. Use /list to see them.")),
    }
    CommandResult::Continue
}

pub(super) fn handle_provider(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if invocation.args.is_empty() {
        let current = session.controller().provider_kind();
        let lines = provider_lines(session.settings(), Some(current));
        session.notify(lines.join("\n"));
        return CommandResult::Continue;
    }

    match invocation.args.parse::<ProviderKind>() {
        Ok(kind) => {
            session.switch_provider(kind);
            let mut status = format!("Provider set: {}", kind.display_name());
            if !session.settings().has_credentials(kind) {
                status.push_str(" (no API key configured; replies are simulated)");
            }
            session.notify(status);
        }
        Err(err) => session.notify(format!("Provider error: {err}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_attach(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    const USAGE: &str = "Usage: /attach file|image|audio VALUE";

    let mut parts = invocation.args.splitn(2, ' ');
    let kind = parts.next().unwrap_or("").to_ascii_lowercase();
    let value = parts.next().unwrap_or("").trim();
    if value.is_empty() {
        session.notify(USAGE);
        return CommandResult::Continue;
    }

    let attachment = match kind.as_str() {
        "file" => Attachment::file(value),
        "image" => Attachment::image(value),
        "audio" => match value.trim_end_matches('s').parse::<u64>() {
            Ok(seconds) => Attachment::audio_seconds(seconds),
            Err(_) => {
                session.notify("Audio length must be a whole number of seconds.");
                return CommandResult::Continue;
            }
        },
        _ => {
            session.notify(USAGE);
            return CommandResult::Continue;
        }
    };

    let marker = attachment.marker();
    session.attach(attachment);
    session.notify(format!(
        "{marker} ({} pending; sent with your next message)",
        session.pending_attachments().len()
    ));
    CommandResult::Continue
}

pub(super) fn handle_clear_attachments(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let cleared = session.clear_attachments();
    session.notify(format!("Cleared {cleared} pending attachment(s)."));
    CommandResult::Continue
}

pub(super) fn handle_dismiss(
    session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    session.controller_mut().clear_error();
    CommandResult::Continue
}

pub(super) fn handle_log(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let parts = invocation.arg_parts();

    let result = match parts.as_slice() {
        [] => session.controller_mut().logging_mut().toggle_logging(),
        [filename] => session
            .controller_mut()
            .logging_mut()
            .set_log_file(filename.to_string()),
        _ => {
            session.notify("Usage: /log [filename]");
            return CommandResult::Continue;
        }
    };

    match result {
        Ok(message) => session.notify(message),
        Err(e) => session.notify(format!("Log error: {e}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_dump(
    session: &mut ChatSession,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let parts = invocation.arg_parts();

    let filename = match parts.as_slice() {
        [] => format!("chatdeck-log-{}.txt", Local::now().format("%Y-%m-%d")),
        [filename] => filename.to_string(),
        _ => {
            session.notify("Usage: /dump [filename]");
            return CommandResult::Continue;
        }
    };

    if session.controller().active_messages().is_empty() {
        session.notify("Nothing to dump; the conversation is empty.");
        return CommandResult::Continue;
    }

    let result = dump_conversation(session.controller().active_messages(), Path::new(&filename));
    match result {
        Ok(()) => session.notify(format!("Conversation dumped to: {filename}")),
        Err(e) => session.notify(format!("Dump error: {e}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_quit(
    _session: &mut ChatSession,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Quit
}
