//! Chat orchestration.
//!
//! [`ChatController`] owns the conversations and walks a submission through
//! its lifecycle: the user message is appended, a [`ResolveRequest`] is
//! handed back to the caller to run, and the result comes back through
//! [`ChatController::apply_resolution`]. Only one request may be pending at
//! a time.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::core::attachments::UserInput;
use crate::core::conversation::{ConversationId, ConversationStore, StoreError};
use crate::core::message::{Message, Role};
use crate::core::providers::{ProviderKind, Resolution, ResolveError, ResponseProvider};
use crate::utils::logging::LoggingState;

/// How long an error stays on screen unless dismissed earlier.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(7);

pub const FALLBACK_ADVISORY: &str =
    "Using simulated responses because the API connection failed. Check the log for details.";

/// Remote replies starting with this are treated as stand-ins.
const FALLBACK_OPENING: &str = "I understand your question about";
/// Remote replies containing this anywhere are treated as stand-ins.
const FALLBACK_DISCLAIMER: &str = "I'm just a simulated AI response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Sending,
    ErrorDisplayed,
}

/// Reasons a submission was rejected. None of them changes any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    EmptyInput,
    Busy,
    Store(StoreError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyInput => write!(f, "nothing to send"),
            SubmitError::Busy => write!(f, "a response is still being generated"),
            SubmitError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    /// Set for warnings that accompany a delivered reply.
    pub advisory: bool,
    shown_at: Instant,
}

impl ErrorBanner {
    fn new(message: impl Into<String>, advisory: bool) -> Self {
        Self {
            message: message.into(),
            advisory,
            shown_at: Instant::now(),
        }
    }

    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= ERROR_DISPLAY_DURATION
    }
}

/// Everything needed to resolve one submission, detached from the
/// controller so it can run on another task.
pub struct ResolveRequest {
    pub request_id: u64,
    pub provider: Arc<dyn ResponseProvider>,
    pub history: Vec<Message>,
    pub prompt_override: Option<String>,
}

impl ResolveRequest {
    pub async fn run(self) -> (u64, Result<Resolution, ResolveError>) {
        let result = self
            .provider
            .resolve(&self.history, self.prompt_override.as_deref())
            .await;
        (self.request_id, result)
    }
}

impl fmt::Debug for ResolveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveRequest")
            .field("request_id", &self.request_id)
            .field("provider", &self.provider.kind())
            .field("history_len", &self.history.len())
            .field("prompt_override", &self.prompt_override)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The assistant reply was appended to `conversation`.
    Replied {
        conversation: ConversationId,
        advisory: bool,
    },
    Failed(ResolveError),
    /// Not the pending request, or its conversation is gone.
    Dropped,
}

struct PendingRequest {
    id: u64,
    conversation: ConversationId,
    provider: ProviderKind,
}

pub struct ChatController {
    store: ConversationStore,
    provider: Arc<dyn ResponseProvider>,
    pending: Option<PendingRequest>,
    error: Option<ErrorBanner>,
    next_request_id: u64,
    logging: LoggingState,
}

impl ChatController {
    /// Start with the welcome conversation and no transcript log.
    pub fn new(provider: Arc<dyn ResponseProvider>) -> Self {
        Self::with_store(ConversationStore::with_welcome(), provider)
    }

    pub fn with_store(store: ConversationStore, provider: Arc<dyn ResponseProvider>) -> Self {
        Self {
            store,
            provider,
            pending: None,
            error: None,
            next_request_id: 0,
            logging: LoggingState::disabled(),
        }
    }

    pub fn with_logging(mut self, logging: LoggingState) -> Self {
        self.logging = logging;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn logging(&self) -> &LoggingState {
        &self.logging
    }

    pub fn logging_mut(&mut self) -> &mut LoggingState {
        &mut self.logging
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Requests already in flight keep the provider they started with.
    pub fn set_provider(&mut self, provider: Arc<dyn ResponseProvider>) {
        debug!(provider = %provider.kind(), "switching provider");
        self.provider = provider;
    }

    pub fn state(&self) -> ChatState {
        if self.pending.is_some() {
            ChatState::Sending
        } else if self.error.is_some() {
            ChatState::ErrorDisplayed
        } else {
            ChatState::Idle
        }
    }

    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Expire the error banner once it has been visible long enough.
    /// Returns whether a banner was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .error
            .as_ref()
            .is_some_and(|banner| banner.is_expired(now));
        if expired {
            self.error = None;
        }
        expired
    }

    pub fn active_messages(&self) -> &[Message] {
        self.store.active_messages()
    }

    pub fn create_conversation(&mut self) -> ConversationId {
        self.error = None;
        self.store.create()
    }

    pub fn select_conversation(&mut self, id: ConversationId) -> Result<(), StoreError> {
        self.store.select(id)?;
        self.error = None;
        Ok(())
    }

    pub fn delete_conversation(&mut self, id: ConversationId) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    /// Parse attachment markers out of `raw` and submit the result.
    pub fn submit_text(&mut self, raw: &str) -> Result<ResolveRequest, SubmitError> {
        self.submit(UserInput::from_raw(raw))
    }

    /// Record the user's message and prepare the provider call.
    pub fn submit(&mut self, input: UserInput) -> Result<ResolveRequest, SubmitError> {
        if input.is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if self.pending.is_some() {
            return Err(SubmitError::Busy);
        }

        let conversation = match self.store.active_id() {
            Some(id) => id,
            None => self.store.create(),
        };

        let content = input.display_content();
        let prompt = input.prompt();
        let has_attachments = !input.attachments.is_empty();

        self.store
            .append(conversation, Role::User, content.clone(), input.attachments)
            .map_err(SubmitError::Store)?;
        self.log_transcript(&format!("You: {content}"));

        self.error = None;
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some(PendingRequest {
            id: request_id,
            conversation,
            provider: self.provider.kind(),
        });

        let history = self
            .store
            .get(conversation)
            .map(|conv| conv.messages().to_vec())
            .unwrap_or_default();

        debug!(
            request_id,
            conversation = %conversation,
            provider = %self.provider.kind(),
            has_attachments,
            "submitting message"
        );

        Ok(ResolveRequest {
            request_id,
            provider: Arc::clone(&self.provider),
            history,
            prompt_override: has_attachments.then_some(prompt),
        })
    }

    /// Fold a finished request back into the conversation.
    pub fn apply_resolution(
        &mut self,
        request_id: u64,
        result: Result<Resolution, ResolveError>,
    ) -> ResolutionOutcome {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == request_id => pending,
            other => {
                self.pending = other;
                warn!(request_id, "ignoring result for a request that is not pending");
                return ResolutionOutcome::Dropped;
            }
        };

        match result {
            Ok(resolution) => {
                let advisory = resolution.fell_back
                    || (pending.provider.is_remote() && has_fallback_signature(&resolution.text));

                if let Err(err) = self.store.append(
                    pending.conversation,
                    Role::Assistant,
                    resolution.text.clone(),
                    Vec::new(),
                ) {
                    warn!(error = %err, "dropping reply for deleted conversation");
                    return ResolutionOutcome::Dropped;
                }
                self.log_transcript(&resolution.text);

                if advisory {
                    self.error = Some(ErrorBanner::new(FALLBACK_ADVISORY, true));
                }
                ResolutionOutcome::Replied {
                    conversation: pending.conversation,
                    advisory,
                }
            }
            Err(err) => {
                warn!(request_id, error = %err, "response resolution failed");
                self.error = Some(ErrorBanner::new(err.user_message(), false));
                ResolutionOutcome::Failed(err)
            }
        }
    }

    /// Submit and resolve in one step.
    pub async fn send(&mut self, input: UserInput) -> Result<ResolutionOutcome, SubmitError> {
        let request = self.submit(input)?;
        let (request_id, result) = request.run().await;
        Ok(self.apply_resolution(request_id, result))
    }

    fn log_transcript(&self, line: &str) {
        if let Err(err) = self.logging.log_message(line) {
            warn!(error = %err, "failed to write transcript log");
        }
    }
}

fn has_fallback_signature(text: &str) -> bool {
    text.starts_with(FALLBACK_OPENING) || text.contains(FALLBACK_DISCLAIMER)
}
