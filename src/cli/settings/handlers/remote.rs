//! Per-provider connection settings (`<provider>-url`, `<provider>-key`).

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{mask_secret, success_set, success_unset};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::{Config, RemoteConfig};
use crate::core::providers::ProviderKind;

#[derive(Clone, Copy)]
pub enum RemoteField {
    Url,
    ApiKey,
}

/// Data-driven handler for one field of a remote provider's table.
pub struct RemoteHandler {
    key: &'static str,
    provider: ProviderKind,
    field: RemoteField,
    example: &'static str,
}

impl RemoteHandler {
    fn slot<'a>(&self, remote: &'a mut RemoteConfig) -> &'a mut Option<String> {
        match self.field {
            RemoteField::Url => &mut remote.url,
            RemoteField::ApiKey => &mut remote.api_key,
        }
    }

    fn remote_mut<'a>(&self, config: &'a mut Config) -> Result<&'a mut RemoteConfig, SettingError> {
        config
            .remote_mut(self.provider)
            .ok_or_else(|| SettingError::UnknownKey(self.key.to_string()))
    }
}

impl SettingHandler for RemoteHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = match args {
            [value] if !value.trim().is_empty() => value.trim().to_string(),
            _ => {
                return Err(SettingError::MissingArgs {
                    hint: match self.field {
                        RemoteField::Url => "To override the endpoint, give the full URL:",
                        RemoteField::ApiKey => "To store an API key, give the key:",
                    },
                    example: self.example,
                })
            }
        };

        let shown = match self.field {
            RemoteField::Url => value.clone(),
            RemoteField::ApiKey => mask_secret(&value),
        };
        let remote = self.remote_mut(config)?;
        *self.slot(remote) = Some(value);
        Ok(success_set(self.key, &shown))
    }

    fn unset(&self, config: &mut Config) -> String {
        if let Ok(remote) = self.remote_mut(config) {
            *self.slot(remote) = None;
        }
        success_unset(self.key)
    }

    fn format(&self, config: &Config) -> String {
        let remote = config.remote(self.provider);
        match self.field {
            RemoteField::Url => {
                let configured = remote.and_then(|remote| remote.url.as_deref());
                match configured {
                    Some(url) => format!("  {}: {url}", self.key),
                    None => format!(
                        "  {}: (unset, default: {})",
                        self.key,
                        config.remote_url(self.provider).unwrap_or_default()
                    ),
                }
            }
            RemoteField::ApiKey => match remote.and_then(|remote| remote.api_key.as_deref()) {
                Some(key) => format!("  {}: {}", self.key, mask_secret(key)),
                None => format!("  {}: (unset)", self.key),
            },
        }
    }
}

pub fn remote_handlers() -> Vec<RemoteHandler> {
    vec![
        RemoteHandler {
            key: "huggingface-url",
            provider: ProviderKind::HuggingFace,
            field: RemoteField::Url,
            example: "chatdeck set huggingface-url https://api-inference.huggingface.co/models/gpt2",
        },
        RemoteHandler {
            key: "huggingface-key",
            provider: ProviderKind::HuggingFace,
            field: RemoteField::ApiKey,
            example: "chatdeck set huggingface-key hf_xxxxxxxx",
        },
        RemoteHandler {
            key: "nlpcloud-url",
            provider: ProviderKind::NlpCloud,
            field: RemoteField::Url,
            example: "chatdeck set nlpcloud-url https://api.nlpcloud.io/v1/gpu/chatgpt/chat",
        },
        RemoteHandler {
            key: "nlpcloud-key",
            provider: ProviderKind::NlpCloud,
            field: RemoteField::ApiKey,
            example: "chatdeck set nlpcloud-key xxxxxxxx",
        },
    ]
}
