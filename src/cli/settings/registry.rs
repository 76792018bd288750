//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{fallback_handler, remote_handlers, DelayHandler, ProviderHandler};
use super::SettingHandler;
use crate::core::config::data::Config;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `chatdeck set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        // Register handlers in display order
        registry.register(Box::new(ProviderHandler));
        registry.register(Box::new(fallback_handler()));
        registry.register(Box::new(DelayHandler));
        for handler in remote_handlers() {
            registry.register(Box::new(handler));
        }

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Every setting with its current value, one per line.
    pub fn format_all(&self, config: &Config) -> String {
        let mut output = String::from("Current configuration:");
        for key in &self.display_order {
            if let Some(handler) = self.get(key) {
                output.push('\n');
                output.push_str(&handler.format(config));
            }
        }
        output
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
