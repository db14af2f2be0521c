//! Mock response source.
//!
//! This module provides the in-process stand-in for a streaming model:
//! - Chunk preparation (deterministic per seed)
//! - A cancellable interval task handle
//! - The chunk generator delivering one chunk per tick

pub mod chunks;
pub mod generator;
pub mod schedule;

pub use chunks::{prepare_chunks, DEFAULT_TARGET_WORDS};
pub use generator::{
    Callbacks, ChunkGenerator, ChunkSink, GeneratorState, StreamEvent, DEFAULT_TICK,
};
pub use schedule::IntervalTask;
