//! Error types for the vchat application.
//!
//! This module defines the top of a small error taxonomy built with `thiserror`.
//! Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error wrapping every shell failure
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Log file / subscriber setup failures
//!   - [`TuiError`] - Terminal setup, rendering and teardown failures
//!
//! # What cannot fail
//!
//! The core never returns errors. Operations on an empty message list are
//! no-ops, height estimation is total, and stopping a stopped generator does
//! nothing. Only the shell (terminal, config file, log file) is fallible.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::TuiError;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// Returned from `main`'s run function. Each variant wraps a concern-specific
/// error, so `?` works directly on config, logging and terminal results.
///
/// # Examples
///
/// ```no_run
/// use vchat::config::ConfigError;
/// use vchat::model::AppError;
///
/// fn run_app() -> Result<(), AppError> {
///     // ConfigError automatically converts to AppError via From
///     load()?;
///     Ok(())
/// }
/// # fn load() -> Result<(), ConfigError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    ///
    /// A missing config file is not an error; this is a file that exists but
    /// cannot be read or is not valid TOML for the expected schema.
    ///
    /// **Recovery**: Print the error to stderr and exit non-zero. The user
    /// fixes the file or passes `--config` with another path.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The log file or tracing subscriber could not be set up.
    ///
    /// **Recovery**: Fatal at startup, reported before the terminal enters
    /// raw mode so the message is readable.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or rendering failure.
    ///
    /// Raised by crossterm/ratatui: raw mode, alternate screen, draw, or
    /// event polling. Without a working terminal the widget cannot run.
    ///
    /// **Recovery**: Restore the terminal, then exit with the message on stderr.
    #[error("Terminal error: {0}")]
    Tui(#[from] TuiError),
}
