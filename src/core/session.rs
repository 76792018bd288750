//! State of one interactive session: the controller plus everything the
//! slash commands act on (pending attachments, provider settings, and
//! the notices waiting to be shown).

use crate::core::attachments::UserInput;
use crate::core::controller::{ChatController, ResolveRequest, SubmitError};
use crate::core::conversation::ConversationId;
use crate::core::message::Attachment;
use crate::core::providers::{build_provider, ProviderKind, ProviderSettings};

pub struct ChatSession {
    controller: ChatController,
    settings: ProviderSettings,
    client: reqwest::Client,
    pending_attachments: Vec<Attachment>,
    notices: Vec<String>,
}

impl ChatSession {
    pub fn new(
        controller: ChatController,
        settings: ProviderSettings,
        client: reqwest::Client,
    ) -> Self {
        Self {
            controller,
            settings,
            client,
            pending_attachments: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ChatController {
        &mut self.controller
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Queue a line for the front end to show.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.pending_attachments.push(attachment);
    }

    pub fn pending_attachments(&self) -> &[Attachment] {
        &self.pending_attachments
    }

    pub fn clear_attachments(&mut self) -> usize {
        let cleared = self.pending_attachments.len();
        self.pending_attachments.clear();
        cleared
    }

    pub fn switch_provider(&mut self, kind: ProviderKind) {
        let provider = build_provider(kind, &self.settings, self.client.clone());
        self.controller.set_provider(provider);
    }

    /// Conversation at 1-based position `index` in creation order.
    pub fn conversation_at(&self, index: usize) -> Option<ConversationId> {
        index
            .checked_sub(1)
            .and_then(|position| self.controller.store().conversations().get(position))
            .map(|conversation| conversation.id())
    }

    /// Submit typed text together with any pending attachments. The
    /// attachments are kept when the submission is rejected.
    pub fn submit(&mut self, text: &str) -> Result<ResolveRequest, SubmitError> {
        let input = self
            .pending_attachments
            .iter()
            .cloned()
            .fold(UserInput::from_raw(text), UserInput::with_attachment);
        let request = self.controller.submit(input)?;
        self.pending_attachments.clear();
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_session as session;

    #[test]
    fn pending_attachments_follow_typed_markers() {
        let mut session = session();
        session.attach(Attachment::audio_seconds(12));

        let request = session
            .submit("[Attached file: a.txt] look")
            .expect("submission accepted");
        assert!(session.pending_attachments().is_empty());
        assert_eq!(
            session.controller().active_messages()[0].attachments(),
            &[Attachment::file("a.txt"), Attachment::audio_seconds(12)]
        );
        assert_eq!(
            request.prompt_override.as_deref(),
            Some("[User has attached a file: a.txt] [User has attached an audio recording: 12s] look")
        );
    }

    #[test]
    fn rejected_submission_keeps_attachments() {
        let mut session = session();
        let _first = session.submit("hello").unwrap();
        session.attach(Attachment::image("cat.png"));

        assert_eq!(session.submit("again").unwrap_err(), SubmitError::Busy);
        assert_eq!(session.pending_attachments().len(), 1);
        assert_eq!(session.clear_attachments(), 1);
    }

    #[test]
    fn conversation_positions_are_one_based() {
        let mut session = session();
        let second = session.controller_mut().create_conversation();
        assert_eq!(session.conversation_at(2), Some(second));
        assert!(session.conversation_at(0).is_none());
        assert!(session.conversation_at(3).is_none());
    }

    #[test]
    fn switching_provider_without_key_keeps_reported_kind() {
        let mut session = session();
        session.switch_provider(ProviderKind::HuggingFace);
        assert_eq!(
            session.controller().provider_kind(),
            ProviderKind::HuggingFace
        );
    }
}
