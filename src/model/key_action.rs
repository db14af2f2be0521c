//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
/// Printable characters never map to an action: they go to the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the message list up by one line. Default: ↑
    ScrollUp,
    /// Scroll the message list down by one line. Default: ↓
    ScrollDown,
    /// Scroll up by one page height. Default: Page Up
    PageUp,
    /// Scroll down by one page height. Default: Page Down
    PageDown,
    /// Jump to the first message. Default: Home
    ScrollToTop,
    /// Jump to the latest message and resume following. Default: End
    ScrollToBottom,

    // Generation
    /// Submit the input line and start generating. Default: Enter
    Submit,
    /// Stop the running generation. Default: Esc
    StopGenerating,

    // Input editing
    /// Delete the character before the cursor. Default: Backspace
    DeleteChar,

    // View
    /// Switch between virtualized and simple list rendering. Default: Tab
    ToggleStrategy,

    // Application
    /// Exit the application. Default: Ctrl+c / Ctrl+q
    Quit,
}

impl KeyAction {
    /// Whether the action moves the viewport.
    pub fn is_scroll(self) -> bool {
        matches!(
            self,
            KeyAction::ScrollUp
                | KeyAction::ScrollDown
                | KeyAction::PageUp
                | KeyAction::PageDown
                | KeyAction::ScrollToTop
                | KeyAction::ScrollToBottom
        )
    }
}
