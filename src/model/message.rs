//! Chat message types.

use super::identifiers::MessageId;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Text typed by the person at the keyboard.
    User,
    /// Generated (mock) assistant output.
    Assistant,
}

impl Role {
    /// Label shown above the message body.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI Assistant",
        }
    }
}

/// A message as submitted to the store, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Author of the message.
    pub role: Role,
    /// Initial content (often empty for a streaming assistant reply).
    pub content: String,
    /// Whether content is still being streamed into this message.
    pub is_streaming: bool,
}

impl NewMessage {
    /// A finished user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            is_streaming: false,
        }
    }

    /// An empty assistant message that content will stream into.
    pub fn streaming_assistant() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            is_streaming: true,
        }
    }
}

/// A message owned by the message store.
///
/// # Lifecycle
/// - Created by the store on append, with a fresh [`MessageId`].
/// - `content` is replaced in place while `is_streaming` is true.
/// - `is_streaming` flips to false exactly once, when generation completes
///   or is stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    is_streaming: bool,
}

impl Message {
    /// Build a stored message from a submission and an assigned id.
    pub fn from_new(id: MessageId, new: NewMessage) -> Self {
        Self {
            id,
            role: new.role,
            content: new.content,
            is_streaming: new.is_streaming,
        }
    }

    /// Unique id assigned on append.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Author role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether content is still streaming in.
    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn push_content(&mut self, chunk: &str) {
        self.content.push_str(chunk);
    }

    /// Clear the streaming flag. Returns true only on the first call.
    pub(crate) fn finish_streaming(&mut self) -> bool {
        std::mem::replace(&mut self.is_streaming, false)
    }
}
