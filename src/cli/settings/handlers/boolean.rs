//! Boolean setting handlers for on/off settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_bool, parse_bool, success_set};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;

/// Data-driven handler for boolean (on/off) settings.
pub struct BooleanHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_value: bool,
    get: fn(&Config) -> Option<bool>,
    set_field: fn(&mut Config, Option<bool>),
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        (self.set_field)(config, Some(value));
        Ok(success_set(self.key, format_bool(value)))
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        format!(
            "✅ Unset {} (will use default: {})",
            self.key,
            format_bool(self.default_value)
        )
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {}", self.key, format_bool(value)),
            None => format!(
                "  {}: (unset, default: {})",
                self.key,
                format_bool(self.default_value)
            ),
        }
    }
}

/// Create a handler for the `fallback` setting.
pub fn fallback_handler() -> BooleanHandler {
    BooleanHandler {
        key: "fallback",
        hint: "To choose whether failed remote calls fall back to simulated replies, specify on or off:",
        example: "chatdeck set fallback off",
        default_value: crate::core::config::defaults::DEFAULT_FALLBACK_ON_FAILURE,
        get: |c| c.fallback_on_failure,
        set_field: |c, v| c.fallback_on_failure = v,
    }
}
