//! Chat state machine (pure).
//!
//! All state transitions are testable without a terminal; time is passed in.

pub mod auto_scroll;
pub mod chat;
pub mod message_store;
pub mod scroll_handler;

pub use auto_scroll::{AutoScrollController, FollowState, ListChange};
pub use chat::{ChatSettings, ChatState, ListStrategy, DEFAULT_PROMPT};
pub use message_store::MessageStore;
pub use scroll_handler::{handle_scroll_action, handle_wheel};
