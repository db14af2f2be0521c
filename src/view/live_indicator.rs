//! Status bar indicators.
//!
//! Pure span builders: the blink phase and follow state are passed in by the
//! event loop, nothing here reads a clock.

use crate::state::FollowState;
use ratatui::{
    style::{Color, Style},
    text::Span,
};

const STREAMING_TEXT: &str = "[STREAMING] ";
const IDLE_TEXT: &str = "[IDLE] ";

/// Streaming indicator: blinking green while a response streams.
///
/// # Examples
///
/// ```rust
/// use vchat::view::live_indicator::LiveIndicator;
///
/// let on = LiveIndicator::new(true, true).render();
/// let off = LiveIndicator::new(true, false).render();
/// assert_eq!(on.content, "[STREAMING] ");
/// assert_eq!(off.content, "");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LiveIndicator {
    streaming: bool,
    blink_on: bool,
}

impl LiveIndicator {
    /// Indicator for the given streaming state and blink phase.
    pub fn new(streaming: bool, blink_on: bool) -> Self {
        Self {
            streaming,
            blink_on,
        }
    }

    /// Render the indicator.
    ///
    /// - idle → gray `[IDLE]`
    /// - streaming, blink on → green `[STREAMING]`
    /// - streaming, blink off → empty (hidden)
    pub fn render(&self) -> Span<'static> {
        match (self.streaming, self.blink_on) {
            (false, _) => Span::styled(IDLE_TEXT, Style::default().fg(Color::Gray)),
            (true, true) => Span::styled(STREAMING_TEXT, Style::default().fg(Color::Green)),
            (true, false) => Span::raw(""),
        }
    }
}

/// Follow-state badge. Detached is highlighted so the user knows new
/// content is arriving below the viewport.
pub fn follow_badge(state: FollowState) -> Span<'static> {
    match state {
        FollowState::Following => Span::styled("[FOLLOWING] ", Style::default().fg(Color::Gray)),
        FollowState::Detached => Span::styled(
            "[DETACHED: End to follow] ",
            Style::default().fg(Color::Yellow),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_gray_regardless_of_blink() {
        for blink in [true, false] {
            let span = LiveIndicator::new(false, blink).render();
            assert_eq!(span.content, IDLE_TEXT);
            assert_eq!(span.style.fg, Some(Color::Gray));
        }
    }

    #[test]
    fn streaming_blinks() {
        let on = LiveIndicator::new(true, true).render();
        assert_eq!(on.content, STREAMING_TEXT);
        assert_eq!(on.style.fg, Some(Color::Green));
        assert_eq!(LiveIndicator::new(true, false).render().content, "");
    }

    #[test]
    fn detached_badge_mentions_end_key() {
        let span = follow_badge(FollowState::Detached);
        assert!(span.content.contains("End"));
        assert_eq!(span.style.fg, Some(Color::Yellow));
        assert!(follow_badge(FollowState::Following).content.contains("FOLLOWING"));
    }
}
