//! Chat styling configuration.
//!
//! Provides distinct colors per role plus the handful of chrome styles the
//! header, input line and status bar use.

use crate::model::Role;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// Priority (first match wins):
    /// 1. `--no-color` flag (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Explicit configuration, ignoring the environment.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== MessageStyles =====

/// Styles for everything the chat widget draws.
///
/// With colors disabled every style keeps its modifiers (bold, dim) but
/// drops foreground colors, so the layout reads the same in monochrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageStyles {
    user: Style,
    assistant: Style,
    cursor: Style,
    header: Style,
    status: Style,
    input_disabled: Style,
}

impl MessageStyles {
    /// Create a new MessageStyles honoring `NO_COLOR`.
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }

    /// Create a new MessageStyles with specified color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        if config.colors_enabled() {
            Self {
                user: bold.fg(Color::Cyan),
                assistant: bold.fg(Color::Green),
                cursor: Style::default().fg(Color::Green),
                header: bold.fg(Color::White).bg(Color::Blue),
                status: Style::default().fg(Color::Gray),
                input_disabled: dim.fg(Color::DarkGray),
            }
        } else {
            Self {
                user: bold,
                assistant: bold,
                cursor: Style::default(),
                header: bold.add_modifier(Modifier::REVERSED),
                status: Style::default(),
                input_disabled: dim,
            }
        }
    }

    /// Style of a row's role label.
    pub fn style_for_role(&self, role: Role) -> Style {
        match role {
            Role::User => self.user,
            Role::Assistant => self.assistant,
        }
    }

    /// Style of the streaming cursor glyph.
    pub fn cursor(&self) -> Style {
        self.cursor
    }

    /// Style of the title bar.
    pub fn header(&self) -> Style {
        self.header
    }

    /// Style of the status bar.
    pub fn status(&self) -> Style {
        self.status
    }

    /// Style of the input line while a response streams.
    pub fn input_disabled(&self) -> Style {
        self.input_disabled
    }
}

impl Default for MessageStyles {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color_env)]
    fn color_config_respects_no_color_flag() {
        let config = ColorConfig::from_env_and_args(true);
        assert!(!config.colors_enabled(), "--no-color flag should disable colors");
    }

    #[test]
    #[serial(no_color_env)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled(), "NO_COLOR env var should disable colors");
    }

    #[test]
    #[serial(no_color_env)]
    fn color_config_enabled_by_default() {
        std::env::remove_var("NO_COLOR");
        assert!(ColorConfig::from_env_and_args(false).colors_enabled());
    }

    #[test]
    fn roles_get_distinct_colors() {
        let styles = MessageStyles::with_color_config(ColorConfig::new(true));
        assert_eq!(styles.style_for_role(Role::User).fg, Some(Color::Cyan));
        assert_eq!(styles.style_for_role(Role::Assistant).fg, Some(Color::Green));
    }

    #[test]
    fn disabled_colors_keep_modifiers_only() {
        let styles = MessageStyles::with_color_config(ColorConfig::new(false));
        let user = styles.style_for_role(Role::User);
        assert_eq!(user.fg, None);
        assert!(user.add_modifier.contains(Modifier::BOLD));
        assert_eq!(styles.cursor(), Style::default());
        assert_eq!(styles.header().bg, None);
    }
}
