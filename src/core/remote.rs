use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, GenerationRequest, GenerationResponse};
use crate::core::message::Message;
use crate::core::providers::{
    effective_prompt, ProviderKind, Resolution, ResolveError, ResponseProvider,
};

/// Longest stretch of an unrecognised body kept in error details.
const BODY_EXCERPT_CHARS: usize = 200;

/// Single-prompt generation endpoint (`{"inputs": prompt}`).
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HuggingFaceProvider {
    pub fn new(client: reqwest::Client, url: String, api_key: &str) -> Self {
        Self {
            client,
            url,
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ResponseProvider for HuggingFaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::HuggingFace
    }

    async fn resolve(
        &self,
        history: &[Message],
        prompt_override: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        let prompt = effective_prompt(history, prompt_override);
        debug!(url = %self.url, prompt, "sending generation request");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&GenerationRequest { inputs: prompt })
            .send()
            .await
            .map_err(classify_transport_error)?;

        let body = read_success_body(response).await?;
        let text = serde_json::from_str::<GenerationResponse>(&body)
            .ok()
            .and_then(GenerationResponse::into_text)
            .ok_or_else(|| ResolveError::UnexpectedFormat(excerpt(&body)))?;
        Ok(Resolution::new(text))
    }
}

/// Chat endpoint that receives the whole conversation
/// (`{"messages": [{role, content}]}`).
pub struct NlpCloudProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl NlpCloudProvider {
    pub fn new(client: reqwest::Client, url: String, api_key: &str) -> Self {
        Self {
            client,
            url,
            api_key: api_key.to_string(),
        }
    }
}

/// Convert history to API messages, swapping the last message's content
/// for `prompt_override` when one is given.
pub fn api_messages(history: &[Message], prompt_override: Option<&str>) -> Vec<ChatMessage> {
    let last = history.len().saturating_sub(1);
    history
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let content = match prompt_override {
                Some(prompt) if index == last => prompt.to_string(),
                _ => message.content.clone(),
            };
            ChatMessage {
                role: message.role.as_str().to_string(),
                content,
            }
        })
        .collect()
}

#[async_trait]
impl ResponseProvider for NlpCloudProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::NlpCloud
    }

    async fn resolve(
        &self,
        history: &[Message],
        prompt_override: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        let request = ChatRequest {
            messages: api_messages(history, prompt_override),
        };
        debug!(url = %self.url, messages = request.messages.len(), "sending chat request");

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let body = read_success_body(response).await?;
        let text = serde_json::from_str::<ChatResponse>(&body)
            .ok()
            .and_then(ChatResponse::into_text)
            .ok_or_else(|| ResolveError::UnexpectedFormat(excerpt(&body)))?;
        Ok(Resolution::new(text))
    }
}

fn classify_transport_error(err: reqwest::Error) -> ResolveError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        ResolveError::Network(err.to_string())
    } else {
        ResolveError::Provider(err.to_string())
    }
}

/// Return the body of a 2xx response or map the status to an error.
async fn read_success_body(response: reqwest::Response) -> Result<String, ResolveError> {
    let status = response.status();
    debug!(status = status.as_u16(), "provider responded");

    match status.as_u16() {
        429 => return Err(ResolveError::RateLimited),
        code @ (401 | 403) => return Err(ResolveError::Auth(code)),
        _ => {}
    }

    let body = response
        .text()
        .await
        .map_err(|err| ResolveError::Network(err.to_string()))?;

    if !status.is_success() {
        return Err(ResolveError::Provider(format!(
            "HTTP {}: {}",
            status.as_u16(),
            summarize_api_error(&body)
        )));
    }
    Ok(body)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("detail").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()))?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(collapsed)
}

/// One-line description of an error body, preferring the message field of
/// a JSON error object.
pub fn summarize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .as_ref()
        .and_then(extract_error_summary)
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| excerpt(trimmed))
}

fn excerpt(body: &str) -> String {
    let mut chars = body.trim().chars();
    let head: String = chars.by_ref().take(BODY_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
