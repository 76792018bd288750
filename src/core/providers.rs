//! Response providers.
//!
//! A [`ResponseProvider`] turns conversation history into the next assistant
//! reply. The provider for a session is chosen once through
//! [`build_provider`]; switching providers means building a new one.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::message::Message;
use crate::core::remote::{HuggingFaceProvider, NlpCloudProvider};
use crate::core::simulate::SimulatedProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Simulate,
    HuggingFace,
    NlpCloud,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Simulate,
        ProviderKind::HuggingFace,
        ProviderKind::NlpCloud,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Simulate => "simulate",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::NlpCloud => "nlpcloud",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Simulate => "Simulation",
            ProviderKind::HuggingFace => "Hugging Face",
            ProviderKind::NlpCloud => "NLP Cloud",
        }
    }

    pub fn is_remote(self) -> bool {
        self != ProviderKind::Simulate
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known = ProviderKind::ALL
            .iter()
            .map(|kind| kind.id())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "unknown provider '{}' (expected one of: {known})", self.0)
    }
}

impl Error for UnknownProvider {}

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| {
                kind.id().eq_ignore_ascii_case(trimmed)
                    || kind.display_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownProvider(trimmed.to_string()))
    }
}

/// Why a provider could not produce a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The request never got a response (DNS, refused connection, timeout).
    Network(String),
    /// HTTP 429.
    RateLimited,
    /// HTTP 401/403.
    Auth(u16),
    /// The provider answered successfully but in a shape we do not know.
    UnexpectedFormat(String),
    Provider(String),
}

impl ResolveError {
    /// The fixed text shown to the user for this failure kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::Network(_) => {
                "Network error. Please check your internet connection and try again."
            }
            ResolveError::RateLimited => {
                "Too many requests. Please wait a moment before trying again."
            }
            ResolveError::Auth(_) => {
                "API key error. Please check your API key in the configuration."
            }
            ResolveError::UnexpectedFormat(_) => {
                "Received an unexpected response format from the API."
            }
            ResolveError::Provider(_) => "Failed to get response. Please try again.",
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Network(detail) => write!(f, "network error: {detail}"),
            ResolveError::RateLimited => write!(f, "rate limited (HTTP 429)"),
            ResolveError::Auth(status) => write!(f, "authentication failed (HTTP {status})"),
            ResolveError::UnexpectedFormat(body) => {
                write!(f, "unexpected API response format: {body}")
            }
            ResolveError::Provider(detail) => write!(f, "provider error: {detail}"),
        }
    }
}

impl Error for ResolveError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    /// A remote provider failed and the simulator answered instead.
    pub fell_back: bool,
}

impl Resolution {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fell_back: false,
        }
    }
}

#[async_trait]
pub trait ResponseProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Produce the reply to `history`.
    ///
    /// `prompt_override`, when given, replaces the content of the last
    /// message for generation purposes only.
    async fn resolve(
        &self,
        history: &[Message],
        prompt_override: Option<&str>,
    ) -> Result<Resolution, ResolveError>;
}

/// The text a provider should answer: the override if present, otherwise
/// the last message's content.
pub fn effective_prompt<'a>(history: &'a [Message], prompt_override: Option<&'a str>) -> &'a str {
    prompt_override
        .or_else(|| history.last().map(|message| message.content.as_str()))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSettings {
    pub api_key: Option<String>,
    pub url: String,
}

impl RemoteSettings {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub huggingface: RemoteSettings,
    pub nlpcloud: RemoteSettings,
    pub fallback_on_failure: bool,
    pub simulate_delay: Duration,
}

impl ProviderSettings {
    pub fn remote(&self, kind: ProviderKind) -> Option<&RemoteSettings> {
        match kind {
            ProviderKind::Simulate => None,
            ProviderKind::HuggingFace => Some(&self.huggingface),
            ProviderKind::NlpCloud => Some(&self.nlpcloud),
        }
    }

    pub fn has_credentials(&self, kind: ProviderKind) -> bool {
        match self.remote(kind) {
            Some(remote) => remote.api_key().is_some(),
            None => true,
        }
    }
}

/// Build the provider for `kind`.
///
/// A remote kind without an API key answers through the simulator. With
/// `fallback_on_failure` set, remote failures are answered by the
/// simulator as well.
pub fn build_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
    client: reqwest::Client,
) -> Arc<dyn ResponseProvider> {
    let simulator = SimulatedProvider::new(settings.simulate_delay);

    let remote: Arc<dyn ResponseProvider> = match (kind, settings.remote(kind)) {
        (ProviderKind::HuggingFace, Some(remote)) if remote.api_key().is_some() => Arc::new(
            HuggingFaceProvider::new(client, remote.url.clone(), remote.api_key().unwrap_or_default()),
        ),
        (ProviderKind::NlpCloud, Some(remote)) if remote.api_key().is_some() => Arc::new(
            NlpCloudProvider::new(client, remote.url.clone(), remote.api_key().unwrap_or_default()),
        ),
        _ => {
            if kind.is_remote() {
                warn!(provider = %kind, "no API key configured; using simulated responses");
            }
            return Arc::new(simulator.reporting_as(kind));
        }
    };

    if settings.fallback_on_failure {
        debug!(provider = %kind, "remote provider with simulated fallback");
        Arc::new(FallbackProvider::new(remote, simulator))
    } else {
        remote
    }
}

/// Answers through the simulator whenever the wrapped provider fails.
pub struct FallbackProvider {
    primary: Arc<dyn ResponseProvider>,
    fallback: SimulatedProvider,
}

impl FallbackProvider {
    pub fn new(primary: Arc<dyn ResponseProvider>, fallback: SimulatedProvider) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl ResponseProvider for FallbackProvider {
    fn kind(&self) -> ProviderKind {
        self.primary.kind()
    }

    async fn resolve(
        &self,
        history: &[Message],
        prompt_override: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        match self.primary.resolve(history, prompt_override).await {
            Ok(resolution) => Ok(resolution),
            Err(err) => {
                warn!(provider = %self.primary.kind(), error = %err, "remote call failed; using simulated response");
                let mut resolution = self.fallback.resolve(history, prompt_override).await?;
                resolution.fell_back = true;
                Ok(resolution)
            }
        }
    }
}
