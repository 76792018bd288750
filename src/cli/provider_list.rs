use std::error::Error;

use crate::core::config::data::Config;
use crate::core::providers::{ProviderKind, ProviderSettings};

/// One line per provider: id, display name, and whether it can reach its
/// backend. `current` is marked with `*`.
pub fn provider_lines(settings: &ProviderSettings, current: Option<ProviderKind>) -> Vec<String> {
    ProviderKind::ALL
        .into_iter()
        .map(|kind| {
            let marker = if Some(kind) == current { "*" } else { " " };
            let status = match settings.remote(kind) {
                None => "local".to_string(),
                Some(remote) if remote.api_key().is_some() => format!("✅ {}", remote.url),
                Some(_) => "❌ no API key (simulated)".to_string(),
            };
            format!("{marker} {:<12} {:<13} {status}", kind.id(), kind.display_name())
        })
        .collect()
}

pub fn list_providers(config: &Config) -> Result<(), Box<dyn Error>> {
    let current = config.provider_kind()?;
    println!("Available providers:\n");
    for line in provider_lines(&config.provider_settings(), Some(current)) {
        println!("{line}");
    }
    println!("\n* = configured provider");
    Ok(())
}
