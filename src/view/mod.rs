//! TUI rendering and terminal management (impure shell)

pub mod constants;
pub mod layout;
pub mod list;
pub mod live_indicator;
pub mod row;
mod styles;

pub use layout::{chat_layout, render_layout, ChatLayout};
pub use list::{render_list, ListStats};
pub use live_indicator::LiveIndicator;
pub use row::{render_row, RowCache, STREAMING_CURSOR};
pub use styles::{ColorConfig, MessageStyles};

use crate::config::keybindings::KeyBindings;
use crate::model::KeyAction;
use crate::state::{ChatSettings, ChatState};
use constants::BLINK_INTERVAL;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::fmt::Display;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Backend failure while sizing or drawing a frame
    #[error("Render error: {0}")]
    Render(String),
}

fn render_error(err: impl Display) -> TuiError {
    TuiError::Render(err.to_string())
}

/// Chat application: terminal, session state and the event loop.
///
/// Generic over backend to support testing with TestBackend
pub struct ChatApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    state: ChatState,
    rows: RowCache,
    styles: MessageStyles,
    key_bindings: KeyBindings,
    blink_on: bool,
    last_blink: Instant,
    last_stats: ListStats,
}

impl<B> ChatApp<B>
where
    B: Backend,
{
    /// Build the app around an already initialized terminal.
    pub fn with_terminal(terminal: Terminal<B>, settings: ChatSettings, styles: MessageStyles) -> Self {
        let rows = RowCache::new(settings.markdown);
        Self {
            terminal,
            state: ChatState::new(settings),
            rows,
            styles,
            key_bindings: KeyBindings::default(),
            blink_on: true,
            last_blink: Instant::now(),
            last_stats: ListStats::default(),
        }
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Between events the loop sleeps until the
    /// next generator tick or blink, so an idle session costs nothing.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self.poll_timeout(Instant::now());
            let mut dirty = false;
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, Instant::now()) {
                            info!("Quit requested");
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Mouse(mouse) => dirty = self.handle_mouse(mouse),
                    Event::Resize(width, height) => {
                        debug!(width, height, "Terminal resized");
                        dirty = true;
                    }
                    _ => {}
                }
            }

            if self.tick(Instant::now()) {
                dirty = true;
            }
            if dirty {
                self.draw()?;
            }
        }
    }

    /// Time to wait for input before the next scheduled wakeup.
    fn poll_timeout(&self, now: Instant) -> Duration {
        let blink = (self.last_blink + BLINK_INTERVAL).saturating_duration_since(now);
        match self.state.next_deadline() {
            Some(due) => due.saturating_duration_since(now).min(blink),
            None => BLINK_INTERVAL,
        }
    }

    /// Advance the generator and the blink phase. Returns true if a redraw
    /// is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut dirty = self.state.tick(now);
        if now.saturating_duration_since(self.last_blink) >= BLINK_INTERVAL {
            self.last_blink = now;
            if self.state.is_generating() {
                self.blink_on = !self.blink_on;
                dirty = true;
            } else if !self.blink_on {
                self.blink_on = true;
                dirty = true;
            }
        }
        dirty
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        let Some(action) = self.key_bindings.get(key) else {
            if let KeyCode::Char(c) = key.code {
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    self.state.push_char(c);
                }
            }
            return false;
        };

        if action.is_scroll() {
            self.state.scroll(action);
            return false;
        }

        match action {
            KeyAction::Quit => return true,
            KeyAction::Submit => {
                self.state.submit(now);
            }
            KeyAction::StopGenerating => {
                self.state.stop();
            }
            KeyAction::DeleteChar => {
                self.state.delete_char();
            }
            KeyAction::ToggleStrategy => {
                self.state.toggle_strategy();
            }
            _ => {}
        }
        false
    }

    /// Handle a single mouse event. Returns true if the view changed.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.state.wheel(-1),
            MouseEventKind::ScrollDown => self.state.wheel(1),
            _ => return false,
        }
        true
    }

    /// Render the current frame
    ///
    /// Reports the list area to the state first so heights and scroll
    /// clamping use this frame's geometry.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size().map_err(render_error)?;
        let layout = chat_layout(Rect::new(0, 0, size.width, size.height));
        self.state.set_viewport(layout.list.width, layout.list.height);

        let Self {
            terminal,
            state,
            rows,
            styles,
            blink_on,
            ..
        } = self;
        let mut stats = ListStats::default();
        terminal
            .draw(|frame| {
                stats = render_layout(frame, state, rows, styles, *blink_on);
            })
            .map_err(render_error)?;
        self.last_stats = stats;
        Ok(())
    }

    /// Session state (read-only).
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Formatted-row cache (read-only).
    pub fn row_cache(&self) -> &RowCache {
        &self.rows
    }

    /// What the last frame's list pass did.
    pub fn last_stats(&self) -> ListStats {
        self.last_stats
    }

    /// Underlying terminal, for inspecting test backends.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Underlying terminal, for resizing test backends.
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

/// Initialize the terminal, run the chat, and restore the terminal.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(settings: ChatSettings, colors: ColorConfig) -> Result<(), TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(TuiError::from)
        .and_then(|terminal: Terminal<CrosstermBackend<Stdout>>| {
            let styles = MessageStyles::with_color_config(colors);
            ChatApp::with_terminal(terminal, settings, styles).run()
        });

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
