//! Attachment handling for user input.
//!
//! Capture widgets historically reported attachments by typing markers such
//! as `[Attached file: notes.txt] ` into the input box. [`extract_attachments`]
//! turns that text back into structured [`Attachment`]s. New front ends
//! should build a [`UserInput`] directly and skip the markers altogether.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::message::Attachment;

/// Shown in place of the message body when the user only sent attachments.
pub const ATTACHMENT_ONLY_CONTENT: &str = "Please analyze the attached content.";

static FILE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Attached file: (.+?)\] ?").expect("file marker pattern is valid")
});
static IMAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Attached image: (.+?)\] ?").expect("image marker pattern is valid")
});
static AUDIO_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Audio recording complete: (.+?)s\] ?").expect("audio marker pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedInput {
    /// Display text with every recognised marker removed.
    pub content: String,
    pub attachments: Vec<Attachment>,
}

/// Pull attachment markers out of raw input text.
///
/// File markers are collected first, then images, then audio; within a kind
/// the textual order is kept. Each marker is removed together with one
/// trailing space. Text without markers is returned unchanged.
pub fn extract_attachments(raw: &str) -> ExtractedInput {
    let mut attachments = Vec::new();
    let mut content = raw.to_string();

    let kinds: [(&Regex, fn(&str) -> Attachment); 3] = [
        (&*FILE_MARKER, |name: &str| Attachment::file(name)),
        (&*IMAGE_MARKER, |name: &str| Attachment::image(name)),
        (&*AUDIO_MARKER, |secs: &str| Attachment::Audio {
            duration: format!("{secs}s"),
        }),
    ];

    for (pattern, build) in kinds {
        if !pattern.is_match(&content) {
            continue;
        }
        attachments.extend(
            pattern
                .captures_iter(&content)
                .filter_map(|caps| caps.get(1))
                .map(|value| build(value.as_str())),
        );
        content = pattern.replace_all(&content, "").into_owned();
    }

    if attachments.is_empty() {
        return ExtractedInput {
            content: raw.to_string(),
            attachments,
        };
    }

    ExtractedInput {
        content: content_or_fallback(content.trim(), true),
        attachments,
    }
}

fn content_or_fallback(text: &str, has_attachments: bool) -> String {
    if has_attachments && text.trim().is_empty() {
        ATTACHMENT_ONLY_CONTENT.to_string()
    } else {
        text.to_string()
    }
}

/// Build the prompt a provider sees: attachment descriptions first, then
/// the visible message text.
pub fn attachment_prompt(content: &str, attachments: &[Attachment]) -> String {
    if attachments.is_empty() {
        return content.to_string();
    }

    let descriptions = attachments
        .iter()
        .map(Attachment::prompt_description)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{descriptions} {content}").trim().to_string()
}

/// A submission with its attachments carried next to the text rather than
/// inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl UserInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// Parse legacy attachment markers out of typed text.
    pub fn from_raw(raw: &str) -> Self {
        let ExtractedInput {
            content,
            attachments,
        } = extract_attachments(raw.trim());
        Self {
            text: content,
            attachments,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }

    /// The text stored in the conversation history.
    pub fn display_content(&self) -> String {
        content_or_fallback(self.text.trim(), !self.attachments.is_empty())
    }

    /// The text handed to the provider in place of the stored content.
    pub fn prompt(&self) -> String {
        attachment_prompt(&self.display_content(), &self.attachments)
    }
}
