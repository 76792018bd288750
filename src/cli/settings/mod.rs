//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the
//! [`SettingRegistry`] dispatches `chatdeck set` / `chatdeck unset` to it
//! and persists the result.

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use std::path::Path;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
///
/// Handlers edit an in-memory [`Config`]; loading and saving happen in the
/// registry.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the configuration value from the arguments given after the key.
    ///
    /// Returns a success message to display.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Unset (clear) the configuration value.
    fn unset(&self, config: &mut Config) -> String;

    /// Format the current value for display in `chatdeck set` output.
    fn format(&self, config: &Config) -> String;
}

/// Apply `chatdeck set <key> <args...>` to the config file at `config_path`.
pub fn set_at(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let mut config = load_config(config_path)?;
    let message = handler.set(args, &mut config)?;
    save_config(&config, config_path)?;
    Ok(message)
}

/// Apply `chatdeck unset <key>` to the config file at `config_path`.
pub fn unset_at(
    registry: &SettingRegistry,
    config_path: &Path,
    key: &str,
) -> Result<String, SettingError> {
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    let mut config = load_config(config_path)?;
    let message = handler.unset(&mut config);
    save_config(&config, config_path)?;
    Ok(message)
}

fn load_config(config_path: &Path) -> Result<Config, SettingError> {
    Config::load_from_path(config_path).map_err(|e| SettingError::ConfigError(e.to_string()))
}

fn save_config(config: &Config, config_path: &Path) -> Result<(), SettingError> {
    config
        .save_to_path(config_path)
        .map_err(|e| SettingError::ConfigError(e.to_string()))
}
