//! Vertical scrolling keyboard action handler.
//!
//! Applies a scroll action to the virtualizer and feeds the resulting user
//! scroll event to the auto-scroll controller. `ScrollToBottom` is the
//! explicit way back into follow mode.

use super::auto_scroll::AutoScrollController;
use crate::model::KeyAction;
use crate::view_state::{ScrollEvent, Virtualizer};

/// Rows moved per mouse wheel notch.
pub const WHEEL_STEP: i64 = 3;

/// Handle a scroll keyboard action.
///
/// Page moves are one viewport height. Non-scroll actions are ignored and
/// return `None`.
pub fn handle_scroll_action(
    virtualizer: &mut Virtualizer,
    follow: &mut AutoScrollController,
    action: KeyAction,
) -> Option<ScrollEvent> {
    let page = i64::from(virtualizer.container_height());
    let event = match action {
        KeyAction::ScrollUp => virtualizer.scroll_by(-1),
        KeyAction::ScrollDown => virtualizer.scroll_by(1),
        KeyAction::PageUp => virtualizer.scroll_by(-page),
        KeyAction::PageDown => virtualizer.scroll_by(page),
        KeyAction::ScrollToTop => virtualizer.scroll_to(0),
        KeyAction::ScrollToBottom => {
            follow.resume();
            let bottom = virtualizer.max_scroll();
            return Some(virtualizer.scroll_to(bottom));
        }
        _ => return None,
    };
    report(virtualizer, follow, event);
    Some(event)
}

/// Handle a mouse wheel scroll of `notches` (negative is up).
pub fn handle_wheel(
    virtualizer: &mut Virtualizer,
    follow: &mut AutoScrollController,
    notches: i64,
) -> ScrollEvent {
    let event = virtualizer.scroll_by(notches.saturating_mul(WHEEL_STEP));
    report(virtualizer, follow, event);
    event
}

fn report(virtualizer: &Virtualizer, follow: &mut AutoScrollController, event: ScrollEvent) {
    follow.on_scroll(
        event,
        virtualizer.total_height(),
        u64::from(virtualizer.container_height()),
    );
}
