//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod provider_list;
pub mod say;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::chat::run_chat;
use crate::cli::provider_list::list_providers;
use crate::cli::say::run_say;
use crate::cli::settings::{set_at, unset_at, SettingRegistry};
use crate::core::config::data::Config;
use crate::core::controller::ChatController;
use crate::core::providers::{build_provider, ProviderKind};
use crate::core::session::ChatSession;
use crate::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "chatdeck", version)]
#[command(about = "A terminal chat client with several conversations and pluggable response providers")]
#[command(
    long_about = "Chatdeck keeps several conversations side by side and answers through a \
built-in simulator or a remote text-generation API (Hugging Face, NLP Cloud). When a remote \
call fails, simulated replies can stand in so the conversation keeps going.\n\n\
Configuration:\n\
  Use 'chatdeck set' to show settings and 'chatdeck set <key> <value>' to change them.\n\n\
Environment Variables:\n\
  CHATDECK_HUGGINGFACE_API_KEY   Hugging Face API key (overrides the config file)\n\
  CHATDECK_NLPCLOUD_API_KEY      NLP Cloud API key (overrides the config file)\n\
  RUST_LOG                       Diagnostic log filter (default: warn)\n\n\
Commands:\n\
  /help             Show all slash commands\n\
  /attach file X    Attach a file to the next message\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Provider to use (simulate, huggingface, nlpcloud)
    #[arg(short = 'p', long, global = true, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Report remote failures instead of answering with simulated replies
    #[arg(long, global = true)]
    pub no_fallback: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default)
    Chat,
    /// Send a single prompt and print the reply
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List providers and whether each has an API key
    Providers,
    /// Set configuration values, or show them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

/// Options shared by every command that talks to a provider.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub provider: Option<String>,
    pub log: Option<String>,
    pub no_fallback: bool,
}

impl From<&Args> for SessionOptions {
    fn from(args: &Args) -> Self {
        Self {
            provider: args.provider.clone(),
            log: args.log.clone(),
            no_fallback: args.no_fallback,
        }
    }
}

/// Build a session on the welcome conversation from the config file and
/// command-line overrides.
pub fn build_session(
    config: &Config,
    options: SessionOptions,
) -> Result<ChatSession, Box<dyn Error>> {
    let kind = match options.provider.as_deref() {
        Some(name) => name.parse::<ProviderKind>()?,
        None => config.provider_kind()?,
    };

    let mut settings = config.provider_settings();
    if options.no_fallback {
        settings.fallback_on_failure = false;
    }

    let client = reqwest::Client::builder().build()?;
    let provider = build_provider(kind, &settings, client.clone());
    let logging = LoggingState::new(options.log)?;
    let controller = ChatController::new(provider).with_logging(logging);

    Ok(ChatSession::new(controller, settings, client))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let options = SessionOptions::from(&args);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = Config::load()?;
            let session = build_session(&config, options)?;
            run_chat(session).await
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            run_say(&config, options, prompt).await
        }
        Commands::Providers => {
            let config = Config::load()?;
            list_providers(&config)
        }
        Commands::Set { key, value } => {
            let registry = SettingRegistry::new();
            let config_path = Config::get_config_path()?;
            match key {
                None => {
                    let config = Config::load_from_path(&config_path)?;
                    println!("{}", registry.format_all(&config));
                }
                Some(key) => match set_at(&registry, &config_path, &key, &value) {
                    Ok(message) => println!("{message}"),
                    Err(err) => {
                        err.print();
                        std::process::exit(err.exit_code());
                    }
                },
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let registry = SettingRegistry::new();
            let config_path = Config::get_config_path()?;
            match unset_at(&registry, &config_path, &key) {
                Ok(message) => println!("{message}"),
                Err(err) => {
                    err.print();
                    std::process::exit(err.exit_code());
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
