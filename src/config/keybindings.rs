//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Printable characters are left unbound: they belong to the input line.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Only the code and modifiers take part in the lookup, so press,
    /// repeat and release events of the same key resolve alike.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Bind a key, replacing any previous binding for it.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = Self {
            bindings: HashMap::new(),
        };

        // Scrolling
        keys.bind(KeyCode::Up, KeyModifiers::NONE, KeyAction::ScrollUp);
        keys.bind(KeyCode::Down, KeyModifiers::NONE, KeyAction::ScrollDown);
        keys.bind(KeyCode::PageUp, KeyModifiers::NONE, KeyAction::PageUp);
        keys.bind(KeyCode::PageDown, KeyModifiers::NONE, KeyAction::PageDown);
        keys.bind(KeyCode::Home, KeyModifiers::NONE, KeyAction::ScrollToTop);
        keys.bind(KeyCode::End, KeyModifiers::NONE, KeyAction::ScrollToBottom);

        // Generation
        keys.bind(KeyCode::Enter, KeyModifiers::NONE, KeyAction::Submit);
        keys.bind(KeyCode::Esc, KeyModifiers::NONE, KeyAction::StopGenerating);

        // Input
        keys.bind(KeyCode::Backspace, KeyModifiers::NONE, KeyAction::DeleteChar);

        // View
        keys.bind(KeyCode::Tab, KeyModifiers::NONE, KeyAction::ToggleStrategy);

        // Application
        keys.bind(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);
        keys.bind(KeyCode::Char('q'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}
