//! vchat: a terminal chat widget with a virtualized message list.
//!
//! Streams mock assistant output into a variable-height list that renders
//! only the visible rows, estimates and caches row heights, and keeps the
//! viewport pinned to the bottom until the user scrolls away.
//!
//! Pure core: [`model`], [`source`], [`state`], [`view_state`].
//! Impure shell: [`view`], [`config`], [`logging`].

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;

#[cfg(test)]
mod test_harness;
