//! Line-based interactive session.

use std::error::Error;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::commands::{process_input, CommandResult};
use crate::core::controller::{ErrorBanner, ResolutionOutcome, SubmitError};
use crate::core::conversation::ConversationId;
use crate::core::message::{Message, Role};
use crate::core::response_service::ResponseService;
use crate::core::session::ChatSession;

/// Prompts offered while the active conversation is empty.
pub const SUGGESTED_PROMPTS: [&str; 3] = [
    "What is artificial intelligence?",
    "Write a function to calculate Fibonacci numbers in JavaScript",
    "Can you explain how React hooks work?",
];

const BANNER_TICK: Duration = Duration::from_secs(1);

pub async fn run_chat(mut session: ChatSession) -> Result<(), Box<dyn Error>> {
    let (service, mut rx) = ResponseService::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(BANNER_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    println!(
        "chatdeck {} | provider: {} | /help for commands, /quit to leave",
        env!("CARGO_PKG_VERSION"),
        session.controller().provider_kind().display_name()
    );
    let mut shown_conversation = session.controller().store().active_id();
    print_conversation(&session);
    show_prompt(&session)?;

    let mut input_closed = false;
    loop {
        if input_closed && !session.controller().is_sending() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if !input_closed => {
                let Some(line) = line? else {
                    input_closed = true;
                    continue;
                };

                match process_input(&mut session, &line) {
                    CommandResult::Quit => break,
                    CommandResult::Continue => {}
                    CommandResult::ProcessAsMessage(text) => match session.submit(&text) {
                        Ok(request) => {
                            println!("… {} is replying", session.controller().provider_kind().display_name());
                            service.spawn(request);
                        }
                        Err(SubmitError::EmptyInput) => {}
                        Err(SubmitError::Busy) => {
                            println!("Still waiting for the previous reply; message not sent.");
                        }
                        Err(err) => println!("❌ {err}"),
                    },
                }

                for notice in session.take_notices() {
                    println!("{notice}");
                }

                let active = session.controller().store().active_id();
                if active != shown_conversation {
                    shown_conversation = active;
                    print_conversation(&session);
                }
                if !session.controller().is_sending() {
                    show_prompt(&session)?;
                }
            }
            Some((request_id, result)) = rx.recv() => {
                let outcome = session.controller_mut().apply_resolution(request_id, result);
                match outcome {
                    ResolutionOutcome::Replied { conversation, .. } => {
                        print_reply(&session, conversation);
                    }
                    ResolutionOutcome::Failed(_) | ResolutionOutcome::Dropped => {}
                }
                if let Some(banner) = session.controller().error() {
                    println!("{}", render_banner(banner));
                }
                show_prompt(&session)?;
            }
            _ = ticker.tick() => {
                session.controller_mut().tick(Instant::now());
            }
        }
    }

    Ok(())
}

fn show_prompt(session: &ChatSession) -> io::Result<()> {
    let pending = session.pending_attachments().len();
    if pending > 0 {
        print!("[{pending} attached] > ");
    } else {
        print!("> ");
    }
    io::stdout().flush()
}

fn print_conversation(session: &ChatSession) {
    let messages = session.controller().active_messages();
    if let Some(conversation) = session.controller().store().active() {
        println!("\n── {} ──", conversation.title());
    }
    if messages.is_empty() {
        println!("{}", render_suggestions());
        return;
    }
    for message in messages {
        println!("{}\n", render_message(message));
    }
}

fn print_reply(session: &ChatSession, conversation: ConversationId) {
    let store = session.controller().store();
    if store.active_id() != Some(conversation) {
        let title = store
            .get(conversation)
            .map(|conversation| conversation.title())
            .unwrap_or_default();
        println!("\nNew reply in \"{title}\".");
        return;
    }
    if let Some(reply) = store
        .get(conversation)
        .and_then(|conversation| conversation.messages().last())
    {
        println!("\n{}\n", render_message(reply));
    }
}

pub fn render_message(message: &Message) -> String {
    let mut rendered = match message.role {
        Role::User => format!("You: {}", message.content),
        Role::Assistant => message.content.clone(),
    };
    for attachment in message.attachments() {
        rendered.push_str("\n  ");
        rendered.push_str(&attachment.marker());
    }
    rendered
}

pub fn render_banner(banner: &ErrorBanner) -> String {
    if banner.advisory {
        format!("⚠️  {} (/dismiss to hide)", banner.message)
    } else {
        format!("❌ {} (/dismiss to hide)", banner.message)
    }
}

pub fn render_suggestions() -> String {
    let mut rendered = String::from("Try asking:");
    for prompt in SUGGESTED_PROMPTS {
        rendered.push_str("\n  • ");
        rendered.push_str(prompt);
    }
    rendered
}
