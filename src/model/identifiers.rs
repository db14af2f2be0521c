//! Opaque identifiers for domain entities.

use std::fmt;
use uuid::Uuid;

/// Unique identifier of a chat message.
///
/// Assigned by the message store on append. Opaque: callers may only
/// compare, hash and display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
