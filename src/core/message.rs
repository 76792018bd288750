use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// Something the user attached to a message.
///
/// Only the descriptor travels through the client; the captured bytes stay
/// with whatever produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    File { name: String },
    Image { name: String },
    /// Elapsed recording time, already suffixed with `s` (e.g. `"12s"`).
    Audio { duration: String },
}

impl Attachment {
    pub fn file(name: impl Into<String>) -> Self {
        Attachment::File { name: name.into() }
    }

    pub fn image(name: impl Into<String>) -> Self {
        Attachment::Image { name: name.into() }
    }

    /// Build an audio attachment from a whole number of recorded seconds.
    pub fn audio_seconds(seconds: u64) -> Self {
        Attachment::Audio {
            duration: format!("{seconds}s"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Attachment::File { .. } => "file",
            Attachment::Image { .. } => "image",
            Attachment::Audio { .. } => "audio",
        }
    }

    /// The text marker a capture widget would have typed into the input box.
    pub fn marker(&self) -> String {
        match self {
            Attachment::File { name } => format!("[Attached file: {name}]"),
            Attachment::Image { name } => format!("[Attached image: {name}]"),
            Attachment::Audio { duration } => format!("[Audio recording complete: {duration}]"),
        }
    }

    /// How the attachment is described to a response provider.
    pub fn prompt_description(&self) -> String {
        match self {
            Attachment::File { name } => format!("[User has attached a file: {name}]"),
            Attachment::Image { name } => format!("[User has attached an image: {name}]"),
            Attachment::Audio { duration } => {
                format!("[User has attached an audio recording: {duration}]")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Never `Some` with an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            metadata: MessageMetadata::default(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.metadata.attachments = if attachments.is_empty() {
            None
        } else {
            Some(attachments)
        };
        self
    }

    pub fn attachments(&self) -> &[Attachment] {
        self.metadata.attachments.as_deref().unwrap_or(&[])
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_attachment_list_is_stored_as_absent() {
        let message = Message::user("hi").with_attachments(Vec::new());
        assert!(message.metadata.attachments.is_none());
        assert!(message.attachments().is_empty());
    }

    #[test]
    fn attachments_serialize_with_type_tag() {
        let message = Message::user("look").with_attachments(vec![
            Attachment::image("cat.png"),
            Attachment::audio_seconds(4),
        ]);
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["role"], "user");
        assert_eq!(json["metadata"]["attachments"][0]["type"], "image");
        assert_eq!(json["metadata"]["attachments"][0]["name"], "cat.png");
        assert_eq!(json["metadata"]["attachments"][1]["type"], "audio");
        assert_eq!(json["metadata"]["attachments"][1]["duration"], "4s");
    }

    #[test]
    fn invalid_role_strings_are_rejected() {
        assert!(Role::try_from("system").is_err());
        assert_eq!(Role::try_from("assistant"), Ok(Role::Assistant));
    }

    #[test]
    fn markers_and_prompt_descriptions() {
        let file = Attachment::file("report.pdf");
        assert_eq!(file.marker(), "[Attached file: report.pdf]");
        assert_eq!(
            file.prompt_description(),
            "[User has attached a file: report.pdf]"
        );
        let audio = Attachment::audio_seconds(7);
        assert_eq!(audio.marker(), "[Audio recording complete: 7s]");
        assert_eq!(
            audio.prompt_description(),
            "[User has attached an audio recording: 7s]"
        );
    }
}
