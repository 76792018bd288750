//! Simple setting handlers for single-value settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{success_set, success_unset, validate_provider};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;

/// Handler for the `provider` setting.
pub struct ProviderHandler;

impl SettingHandler for ProviderHandler {
    fn key(&self) -> &'static str {
        "provider"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the provider, specify one of simulate, huggingface, nlpcloud:",
                example: "chatdeck set provider huggingface",
            });
        }

        let provider = validate_provider(&args.join(" "))?;
        config.provider = Some(provider.id().to_string());
        Ok(success_set("provider", provider.id()))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.provider = None;
        format!("{} (will use default: simulate)", success_unset("provider"))
    }

    fn format(&self, config: &Config) -> String {
        match &config.provider {
            Some(provider) => format!("  provider: {provider}"),
            None => "  provider: (unset, default: simulate)".to_string(),
        }
    }
}

/// Handler for the `delay` setting (simulated response latency).
pub struct DelayHandler;

impl SettingHandler for DelayHandler {
    fn key(&self) -> &'static str {
        "delay"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = match args {
            [value] => value,
            _ => {
                return Err(SettingError::MissingArgs {
                    hint: "To set the simulated response delay, give milliseconds:",
                    example: "chatdeck set delay 250",
                })
            }
        };

        let millis = input
            .trim()
            .trim_end_matches("ms")
            .parse::<u64>()
            .map_err(|_| SettingError::InvalidNumber(input.clone()))?;
        config.simulate_delay_ms = Some(millis);
        Ok(success_set("delay", &format!("{millis}ms")))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.simulate_delay_ms = None;
        format!(
            "{} (will use default: {}ms)",
            success_unset("delay"),
            Config::default().simulate_delay().as_millis()
        )
    }

    fn format(&self, config: &Config) -> String {
        match config.simulate_delay_ms {
            Some(millis) => format!("  delay: {millis}ms"),
            None => format!(
                "  delay: (unset, default: {}ms)",
                config.simulate_delay().as_millis()
            ),
        }
    }
}
