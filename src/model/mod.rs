//! Domain model types for the chat widget.
//!
//! Pure data: no terminal, no clock, no I/O.

pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod message;

pub use error::AppError;
pub use identifiers::MessageId;
pub use key_action::KeyAction;
pub use message::{Message, NewMessage, Role};
