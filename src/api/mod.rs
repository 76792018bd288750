//! Request and response payloads for the remote text-generation APIs.

use serde::{Deserialize, Serialize};

/// Body of a single-prompt generation request (`{"inputs": "..."}`).
#[derive(Serialize)]
pub struct GenerationRequest<'a> {
    pub inputs: &'a str,
}

#[derive(Deserialize)]
pub struct GeneratedText {
    #[serde(default)]
    pub generated_text: Option<String>,
}

/// Generation endpoints answer either with a bare JSON string or with a list
/// of candidates.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum GenerationResponse {
    Text(String),
    Candidates(Vec<GeneratedText>),
}

impl GenerationResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            GenerationResponse::Text(text) => Some(text).filter(|text| !text.is_empty()),
            GenerationResponse::Candidates(candidates) => candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.generated_text)
                .filter(|text| !text.is_empty()),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of a chat request carrying the whole conversation.
#[derive(Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatResponse {
    pub fn into_text(self) -> Option<String> {
        self.response.filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_response_accepts_both_shapes() {
        let text: GenerationResponse = serde_json::from_str(r#""plain reply""#).unwrap();
        assert_eq!(text.into_text().as_deref(), Some("plain reply"));

        let list: GenerationResponse =
            serde_json::from_str(r#"[{"generated_text":"first"},{"generated_text":"second"}]"#)
                .unwrap();
        assert_eq!(list.into_text().as_deref(), Some("first"));
    }

    #[test]
    fn empty_candidates_have_no_text() {
        let empty: GenerationResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.into_text().is_none());

        let blank: GenerationResponse =
            serde_json::from_str(r#"[{"generated_text":""}]"#).unwrap();
        assert!(blank.into_text().is_none());

        let blank_text: GenerationResponse = serde_json::from_str(r#""""#).unwrap();
        assert!(blank_text.into_text().is_none());
    }

    #[test]
    fn object_is_not_a_generation_response() {
        assert!(serde_json::from_str::<GenerationResponse>(r#"{"error":"loading"}"#).is_err());
    }

    #[test]
    fn chat_response_requires_response_field() {
        let ok: ChatResponse = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(ok.into_text().as_deref(), Some("hi"));

        let missing: ChatResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(missing.into_text().is_none());
    }
}
