use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::config::defaults::{
    DEFAULT_FALLBACK_ON_FAILURE, DEFAULT_HUGGINGFACE_URL, DEFAULT_NLPCLOUD_URL,
    HUGGINGFACE_API_KEY_ENV, NLPCLOUD_API_KEY_ENV,
};
use crate::core::providers::{ProviderKind, ProviderSettings, RemoteSettings, UnknownProvider};
use crate::core::simulate::DEFAULT_SIMULATED_DELAY;

/// Connection details for one remote provider.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub api_key: Option<String>,
    /// Endpoint override; the built-in URL is used when unset
    pub url: Option<String>,
}

impl RemoteConfig {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.url.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Provider id used when none is given on the command line
    pub provider: Option<String>,
    /// Answer with simulated responses when a remote call fails
    pub fallback_on_failure: Option<bool>,
    /// Artificial latency of simulated responses
    pub simulate_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "RemoteConfig::is_empty")]
    pub huggingface: RemoteConfig,
    #[serde(default, skip_serializing_if = "RemoteConfig::is_empty")]
    pub nlpcloud: RemoteConfig,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn remote(&self, kind: ProviderKind) -> Option<&RemoteConfig> {
        match kind {
            ProviderKind::Simulate => None,
            ProviderKind::HuggingFace => Some(&self.huggingface),
            ProviderKind::NlpCloud => Some(&self.nlpcloud),
        }
    }

    pub fn remote_mut(&mut self, kind: ProviderKind) -> Option<&mut RemoteConfig> {
        match kind {
            ProviderKind::Simulate => None,
            ProviderKind::HuggingFace => Some(&mut self.huggingface),
            ProviderKind::NlpCloud => Some(&mut self.nlpcloud),
        }
    }

    /// The configured provider, or the simulator when none is set.
    pub fn provider_kind(&self) -> Result<ProviderKind, UnknownProvider> {
        self.provider
            .as_deref()
            .map(str::parse)
            .transpose()
            .map(|kind| kind.unwrap_or(ProviderKind::Simulate))
    }

    pub fn fallback_on_failure(&self) -> bool {
        self.fallback_on_failure
            .unwrap_or(DEFAULT_FALLBACK_ON_FAILURE)
    }

    pub fn simulate_delay(&self) -> Duration {
        self.simulate_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SIMULATED_DELAY)
    }

    pub fn remote_url(&self, kind: ProviderKind) -> Option<String> {
        let default_url = match kind {
            ProviderKind::Simulate => return None,
            ProviderKind::HuggingFace => DEFAULT_HUGGINGFACE_URL,
            ProviderKind::NlpCloud => DEFAULT_NLPCLOUD_URL,
        };
        let configured = self
            .remote(kind)
            .and_then(|remote| remote.url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty());
        Some(configured.unwrap_or(default_url).to_string())
    }

    /// Provider settings with API keys taken from the environment when set
    /// there.
    pub fn provider_settings(&self) -> ProviderSettings {
        self.provider_settings_with_env(|name| std::env::var(name).ok())
    }

    pub fn provider_settings_with_env<F>(&self, env: F) -> ProviderSettings
    where
        F: Fn(&str) -> Option<String>,
    {
        let remote_settings = |kind: ProviderKind, env_name: &str| {
            let api_key = env(env_name)
                .filter(|key| !key.trim().is_empty())
                .or_else(|| self.remote(kind).and_then(|remote| remote.api_key.clone()));
            RemoteSettings {
                api_key,
                url: self.remote_url(kind).unwrap_or_default(),
            }
        };

        ProviderSettings {
            huggingface: remote_settings(ProviderKind::HuggingFace, HUGGINGFACE_API_KEY_ENV),
            nlpcloud: remote_settings(ProviderKind::NlpCloud, NLPCLOUD_API_KEY_ENV),
            fallback_on_failure: self.fallback_on_failure(),
            simulate_delay: self.simulate_delay(),
        }
    }
}
