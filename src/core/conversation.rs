use std::error::Error;
use std::fmt;

use chrono::{DateTime, Local};

use crate::core::message::{Attachment, Message, Role};

/// Title given to the conversation that exists at start-up.
pub const WELCOME_TITLE: &str = "Welcome Conversation";
/// Title given to conversations created on request.
pub const NEW_CONVERSATION_TITLE: &str = "New Conversation";

const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(u64);

impl ConversationId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound(ConversationId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "conversation {id} does not exist"),
        }
    }
}

impl Error for StoreError {}

#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    messages: Vec<Message>,
    created_at: DateTime<Local>,
}

impl Conversation {
    fn new(id: ConversationId, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            messages: Vec::new(),
            created_at: Local::now(),
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    fn has_sentinel_title(&self) -> bool {
        self.title == WELCOME_TITLE || self.title == NEW_CONVERSATION_TITLE
    }

    fn push(&mut self, message: Message) {
        if message.is_user()
            && self.has_sentinel_title()
            && !self.messages.iter().any(Message::is_user)
        {
            self.title = title_from_content(&message.content);
        }
        self.messages.push(message);
    }
}

/// First 30 characters of `content`, with `...` appended only when
/// something was cut off.
pub fn title_from_content(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Every conversation of a session, in creation order, plus the active
/// pointer.
///
/// The active pointer is `Some` whenever the store holds at least one
/// conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: Option<ConversationId>,
    next_id: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the single start-up conversation.
    pub fn with_welcome() -> Self {
        let mut store = Self::new();
        store.insert(WELCOME_TITLE);
        store
    }

    fn insert(&mut self, title: &str) -> ConversationId {
        self.next_id += 1;
        let id = ConversationId(self.next_id);
        self.conversations.push(Conversation::new(id, title));
        self.active = Some(id);
        id
    }

    pub fn create(&mut self) -> ConversationId {
        self.insert(NEW_CONVERSATION_TITLE)
    }

    pub fn select(&mut self, id: ConversationId) -> Result<(), StoreError> {
        self.position(id)?;
        self.active = Some(id);
        Ok(())
    }

    pub fn delete(&mut self, id: ConversationId) -> Result<(), StoreError> {
        let index = self.position(id)?;
        self.conversations.remove(index);

        if self.active == Some(id) {
            self.active = self.conversations.first().map(Conversation::id);
        }
        Ok(())
    }

    pub fn append(
        &mut self,
        id: ConversationId,
        role: Role,
        content: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Result<(), StoreError> {
        let index = self.position(id)?;
        let message = Message::new(role, content).with_attachments(attachments);
        self.conversations[index].push(message);
        Ok(())
    }

    pub fn active_messages(&self) -> &[Message] {
        self.active().map(Conversation::messages).unwrap_or(&[])
    }

    pub fn active_id(&self) -> Option<ConversationId> {
        self.active
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|conv| conv.id == id)
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn position(&self, id: ConversationId) -> Result<usize, StoreError> {
        self.conversations
            .iter()
            .position(|conv| conv.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_single_active(store: &ConversationStore) {
        if store.is_empty() {
            assert_eq!(store.active_id(), None);
        } else {
            let active = store.active_id().expect("non-empty store has an active conversation");
            assert!(store.get(active).is_some(), "active id must exist");
        }
    }

    #[test]
    fn starts_with_welcome_conversation() {
        let store = ConversationStore::with_welcome();
        assert_eq!(store.len(), 1);
        let active = store.active().expect("welcome conversation is active");
        assert_eq!(active.title(), WELCOME_TITLE);
        assert!(store.active_messages().is_empty());
    }

    #[test]
    fn create_activates_new_conversation() {
        let mut store = ConversationStore::with_welcome();
        let first = store.active_id().unwrap();
        let second = store.create();
        assert_ne!(first, second);
        assert_eq!(store.active_id(), Some(second));
        assert_eq!(store.get(second).unwrap().title(), NEW_CONVERSATION_TITLE);
    }

    #[test]
    fn select_unknown_id_leaves_state_unchanged() {
        let mut store = ConversationStore::with_welcome();
        let first = store.active_id().unwrap();
        let second = store.create();
        store.delete(first).unwrap();

        assert_eq!(store.select(first), Err(StoreError::NotFound(first)));
        assert_eq!(store.active_id(), Some(second));
    }

    #[test]
    fn deleting_active_picks_first_remaining() {
        let mut store = ConversationStore::with_welcome();
        let a = store.active_id().unwrap();
        let b = store.create();
        let c = store.create();
        assert_eq!(store.active_id(), Some(c));

        store.delete(c).unwrap();
        assert_eq!(store.active_id(), Some(a));

        store.select(b).unwrap();
        store.delete(b).unwrap();
        assert_eq!(store.active_id(), Some(a));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn deleting_inactive_keeps_active_pointer() {
        let mut store = ConversationStore::with_welcome();
        let a = store.active_id().unwrap();
        let b = store.create();
        store.delete(a).unwrap();
        assert_eq!(store.active_id(), Some(b));
    }

    #[test]
    fn deleting_last_conversation_clears_active() {
        let mut store = ConversationStore::with_welcome();
        let a = store.active_id().unwrap();
        store.delete(a).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
        assert!(store.active_messages().is_empty());
        assert_eq!(store.delete(a), Err(StoreError::NotFound(a)));
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = ConversationStore::with_welcome();
        let a = store.active_id().unwrap();
        store.delete(a).unwrap();
        let b = store.create();
        assert_ne!(a, b);
    }

    #[test]
    fn exactly_one_active_across_create_delete_sequences() {
        let mut store = ConversationStore::with_welcome();
        let mut ids = vec![store.active_id().unwrap()];
        // Interleave creates with deletes from the front, the back and the middle.
        for step in 0..24 {
            if step % 3 == 2 && !ids.is_empty() {
                let victim = ids.remove((step / 3) % ids.len());
                store.delete(victim).unwrap();
            } else {
                ids.push(store.create());
            }
            assert_single_active(&store);
        }
        while let Some(id) = ids.pop() {
            store.delete(id).unwrap();
            assert_single_active(&store);
        }
    }

    #[test]
    fn first_user_message_sets_title() {
        let cases = [
            ("a".repeat(29), "a".repeat(29)),
            ("b".repeat(30), "b".repeat(30)),
            ("c".repeat(31), format!("{}...", "c".repeat(30))),
        ];
        for (content, expected) in cases {
            let mut store = ConversationStore::with_welcome();
            let id = store.active_id().unwrap();
            store.append(id, Role::User, content, Vec::new()).unwrap();
            assert_eq!(store.get(id).unwrap().title(), expected);
        }
    }

    #[test]
    fn title_is_only_rewritten_once() {
        let mut store = ConversationStore::new();
        let id = store.create();
        store
            .append(id, Role::Assistant, "greeting first", Vec::new())
            .unwrap();
        assert_eq!(store.get(id).unwrap().title(), NEW_CONVERSATION_TITLE);

        store.append(id, Role::User, "first question", Vec::new()).unwrap();
        store.append(id, Role::User, "second question", Vec::new()).unwrap();
        assert_eq!(store.get(id).unwrap().title(), "first question");
    }

    #[test]
    fn title_truncation_counts_characters() {
        let content = "é".repeat(31);
        assert_eq!(title_from_content(&content), format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn append_to_missing_conversation_fails() {
        let mut store = ConversationStore::with_welcome();
        let id = store.active_id().unwrap();
        store.delete(id).unwrap();
        assert_eq!(
            store.append(id, Role::User, "lost", Vec::new()),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn messages_keep_insertion_order_and_attachments() {
        let mut store = ConversationStore::with_welcome();
        let id = store.active_id().unwrap();
        store
            .append(id, Role::User, "one", vec![Attachment::file("a.txt")])
            .unwrap();
        store.append(id, Role::Assistant, "two", Vec::new()).unwrap();

        let messages = store.active_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "one");
        assert_eq!(messages[0].attachments(), &[Attachment::file("a.txt")]);
        assert_eq!(messages[1].content, "two");
        assert!(messages[1].metadata.attachments.is_none());
    }
}
