//! One-shot "say" command

use std::error::Error;

use crate::cli::{build_session, SessionOptions};
use crate::core::config::data::Config;
use crate::core::controller::{ResolutionOutcome, SubmitError};

pub async fn run_say(
    config: &Config,
    options: SessionOptions,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: chatdeck say <prompt>");
        std::process::exit(1);
    }

    let mut session = build_session(config, options)?;
    let request = match session.submit(&prompt) {
        Ok(request) => request,
        Err(SubmitError::EmptyInput) => {
            eprintln!("Usage: chatdeck say <prompt>");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    let (request_id, result) = request.run().await;
    match session.controller_mut().apply_resolution(request_id, result) {
        ResolutionOutcome::Replied { conversation, advisory } => {
            if let Some(reply) = session
                .controller()
                .store()
                .get(conversation)
                .and_then(|conversation| conversation.messages().last())
            {
                println!("{}", reply.content);
            }
            if advisory {
                if let Some(banner) = session.controller().error() {
                    eprintln!("⚠️  {}", banner.message);
                }
            }
            Ok(())
        }
        ResolutionOutcome::Failed(err) => {
            eprintln!("❌ Error: {}", err.user_message());
            std::process::exit(1);
        }
        ResolutionOutcome::Dropped => {
            eprintln!("❌ Error: the reply could not be delivered");
            std::process::exit(1);
        }
    }
}
