//! Layout dimension constants for TUI rendering.

use std::time::Duration;

/// Height of the title bar in lines.
pub const HEADER_HEIGHT: u16 = 1;

/// Height of the input box in lines (border + content).
pub const INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Blink period of the streaming indicator, and the idle poll timeout.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);
