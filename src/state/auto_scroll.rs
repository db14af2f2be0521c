//! Auto-scroll controller.
//!
//! Two states. While [`FollowState::Following`], every list change (append
//! or streaming content update) scrolls the last row's bottom to the bottom
//! of the viewport. A user scroll that ends farther than the near-bottom
//! threshold from the bottom edge moves to [`FollowState::Detached`], where
//! list changes leave the viewport alone. A user scroll that ends near the
//! bottom, or an explicit [`AutoScrollController::resume`], follows again.
//! Programmatic scrolls never change state.

use crate::model::{Message, MessageId};
use crate::view_state::{Align, ScrollEvent, ScrollTarget};
use tracing::{debug, trace};

/// Default near-bottom threshold in rows.
///
/// A 100px margin at roughly 20px per line. Scrolling up by fewer rows
/// than this keeps following.
pub const DEFAULT_NEAR_BOTTOM_THRESHOLD: u64 = 5;

/// Whether the viewport tracks the end of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowState {
    /// Auto-scroll enabled.
    #[default]
    Following,
    /// User scrolled away; list changes do not scroll.
    Detached,
}

/// Kind of list change seen by [`AutoScrollController::on_list_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// The list was empty.
    Empty,
    /// The last message is new since the previous update.
    Appended,
    /// Same last message as before (its content may have changed).
    Updated,
}

/// Distance test: `scroll_height - offset - container < threshold`.
///
/// Saturating, so a list shorter than the viewport is always near bottom.
pub fn is_near_bottom(scroll_height: u64, offset: u64, container_height: u64, threshold: u64) -> bool {
    scroll_height
        .saturating_sub(offset)
        .saturating_sub(container_height)
        < threshold
}

/// Decides when list changes force the viewport to the bottom.
#[derive(Debug, Clone)]
pub struct AutoScrollController {
    state: FollowState,
    threshold: u64,
    last_seen: Option<MessageId>,
}

impl Default for AutoScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_BOTTOM_THRESHOLD)
    }
}

impl AutoScrollController {
    /// Following controller with the given near-bottom threshold in rows.
    pub fn new(threshold: u64) -> Self {
        Self {
            state: FollowState::Following,
            threshold,
            last_seen: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> FollowState {
        self.state
    }

    /// True while following.
    pub fn is_following(&self) -> bool {
        self.state == FollowState::Following
    }

    /// Near-bottom threshold in rows.
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// React to a scroll of the viewport.
    ///
    /// Programmatic scrolls are ignored. A user scroll re-evaluates the
    /// near-bottom test and sets the state from it.
    pub fn on_scroll(&mut self, event: ScrollEvent, scroll_height: u64, container_height: u64) -> FollowState {
        if event.programmatic {
            return self.state;
        }
        let next = if is_near_bottom(scroll_height, event.offset, container_height, self.threshold) {
            FollowState::Following
        } else {
            FollowState::Detached
        };
        self.transition(next, "user scroll");
        self.state
    }

    /// Explicit return to the bottom: follow again regardless of position.
    pub fn resume(&mut self) {
        self.transition(FollowState::Following, "resume");
    }

    /// React to a change of the message list.
    ///
    /// While following, scrolls to the last row with [`Align::End`]. Returns
    /// the kind of change seen and the scroll issued, if any.
    pub fn on_list_update<T>(&mut self, messages: &[Message], target: &mut T) -> (ListChange, Option<ScrollEvent>)
    where
        T: ScrollTarget + ?Sized,
    {
        let Some(last) = messages.last() else {
            self.last_seen = None;
            return (ListChange::Empty, None);
        };
        let change = if self.last_seen == Some(last.id()) {
            ListChange::Updated
        } else {
            self.last_seen = Some(last.id());
            ListChange::Appended
        };

        let scrolled = match self.state {
            FollowState::Following => target.scroll_to_index(messages.len() - 1, Align::End),
            FollowState::Detached => None,
        };
        trace!(?change, state = ?self.state, scrolled = scrolled.is_some(), "List update");
        (change, scrolled)
    }

    fn transition(&mut self, next: FollowState, cause: &str) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, cause, "Auto-scroll state changed");
            self.state = next;
        }
    }
}

#[cfg(test)]
#[path = "auto_scroll_tests.rs"]
mod tests;
