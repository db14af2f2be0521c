//! Ordered message list with a generating flag.
//!
//! The store is the single owner of messages. Other components read
//! snapshots; only the store's operations mutate.

use crate::model::{Message, MessageId, NewMessage};
use tracing::trace;

/// Explicitly owned chat history.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    generating: bool,
}

impl MessageStore {
    /// Empty store, not generating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, assigning it a fresh id.
    pub fn append(&mut self, message: NewMessage) -> MessageId {
        let id = MessageId::new_random();
        trace!(%id, role = ?message.role, "Appending message");
        self.messages.push(Message::from_new(id, message));
        id
    }

    /// Replace the content of the last message in place.
    ///
    /// No-op on an empty store. Returns true if a message was updated.
    pub fn update_last_content(&mut self, content: impl Into<String>) -> bool {
        match self.messages.last_mut() {
            Some(last) => {
                last.set_content(content.into());
                true
            }
            None => false,
        }
    }

    /// Append `chunk` to the content of the last message.
    ///
    /// Equivalent to [`update_last_content`](Self::update_last_content) with
    /// the previous content plus `chunk`, without copying what is already
    /// there. No-op on an empty store.
    pub fn append_to_last(&mut self, chunk: &str) -> bool {
        match self.messages.last_mut() {
            Some(last) => {
                last.push_content(chunk);
                true
            }
            None => false,
        }
    }

    /// Clear the streaming flag of the last message.
    ///
    /// Returns true if the flag was set. No-op on an empty store.
    pub fn finish_streaming(&mut self) -> bool {
        self.messages
            .last_mut()
            .is_some_and(Message::finish_streaming)
    }

    /// Set the generating flag.
    pub fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
    }

    /// Whether a response is being generated.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Read-only view of all messages in order.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn append_assigns_unique_ids() {
        let mut store = MessageStore::new();
        let a = store.append(NewMessage::user("a"));
        let b = store.append(NewMessage::user("a"));
        assert_ne!(a, b);
        assert_eq!(store.snapshot()[0].id(), a);
        assert_eq!(store.snapshot()[1].id(), b);
    }

    #[test]
    fn update_last_content_on_empty_is_noop() {
        let mut store = MessageStore::new();
        assert!(!store.update_last_content("x"));
        assert!(store.is_empty());
    }

    #[test]
    fn update_last_content_only_touches_last() {
        let mut store = MessageStore::new();
        store.append(NewMessage::user("first"));
        let id = store.append(NewMessage::streaming_assistant());
        assert!(store.update_last_content("partial"));
        assert!(store.update_last_content("partial answer"));
        assert_eq!(store.snapshot()[0].content(), "first");
        let last = store.last().unwrap();
        assert_eq!(last.id(), id, "updated in place");
        assert_eq!(last.content(), "partial answer");
        assert_eq!(last.role(), Role::Assistant);
    }

    #[test]
    fn append_to_last_extends_in_place() {
        let mut store = MessageStore::new();
        assert!(!store.append_to_last("x"), "no-op when empty");

        store.append(NewMessage::user("first"));
        let id = store.append(NewMessage::streaming_assistant());
        assert!(store.append_to_last("Lorem "));
        assert!(store.append_to_last("ipsum "));
        let last = store.last().unwrap();
        assert_eq!(last.id(), id);
        assert_eq!(last.content(), "Lorem ipsum ");
        assert_eq!(store.snapshot()[0].content(), "first");
    }

    #[test]
    fn finish_streaming_once() {
        let mut store = MessageStore::new();
        assert!(!store.finish_streaming());
        store.append(NewMessage::streaming_assistant());
        assert!(store.finish_streaming());
        assert!(!store.finish_streaming());
        assert!(!store.last().unwrap().is_streaming());
    }

    #[test]
    fn generating_flag() {
        let mut store = MessageStore::new();
        assert!(!store.is_generating());
        store.set_generating(true);
        assert!(store.is_generating());
        store.set_generating(false);
        assert!(!store.is_generating());
    }
}
