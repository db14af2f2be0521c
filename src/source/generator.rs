//! Mock chunk generator.
//!
//! Delivers a fixed, pre-computed sequence of chunks to a [`ChunkSink`], one
//! chunk per tick of an [`IntervalTask`]. Delivery is driven by the caller
//! through [`ChunkGenerator::poll`], so every callback runs on the caller's
//! thread in tick order.

use super::schedule::IntervalTask;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Default tick period between chunks.
pub const DEFAULT_TICK: Duration = Duration::from_millis(15);

/// Receiver of generator output.
pub trait ChunkSink {
    /// Called once per delivered chunk, in order.
    fn on_chunk(&mut self, chunk: &str);
    /// Called once, after the final chunk. Never called after a stop.
    fn on_complete(&mut self);
}

/// A [`ChunkSink`] made from two closures.
pub struct Callbacks<C, D> {
    on_chunk: C,
    on_complete: D,
}

impl<C, D> Callbacks<C, D>
where
    C: FnMut(&str),
    D: FnMut(),
{
    /// Pair a chunk callback with a completion callback.
    pub fn new(on_chunk: C, on_complete: D) -> Self {
        Self {
            on_chunk,
            on_complete,
        }
    }
}

impl<C, D> ChunkSink for Callbacks<C, D>
where
    C: FnMut(&str),
    D: FnMut(),
{
    fn on_chunk(&mut self, chunk: &str) {
        (self.on_chunk)(chunk)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

/// Generator output queued for the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One chunk of text to append.
    Chunk(String),
    /// All chunks were delivered.
    Complete,
}

impl ChunkSink for Sender<StreamEvent> {
    fn on_chunk(&mut self, chunk: &str) {
        if self.send(StreamEvent::Chunk(chunk.to_string())).is_err() {
            trace!("Stream receiver dropped, discarding chunk");
        }
    }

    fn on_complete(&mut self) {
        if self.send(StreamEvent::Complete).is_err() {
            trace!("Stream receiver dropped, discarding completion");
        }
    }
}

/// Lifecycle of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Constructed, not started.
    Idle,
    /// Delivering chunks.
    Running,
    /// Every chunk delivered and completion reported.
    Completed,
    /// Halted by [`ChunkGenerator::stop`] before completion.
    Stopped,
}

/// Delivers pre-computed chunks on a fixed tick.
pub struct ChunkGenerator<S> {
    chunks: Vec<String>,
    next: usize,
    task: IntervalTask,
    sink: S,
    state: GeneratorState,
}

impl<S: ChunkSink> ChunkGenerator<S> {
    /// Generator over `chunks`, ticking every `period`, reporting to `sink`.
    pub fn new(chunks: Vec<String>, period: Duration, sink: S) -> Self {
        Self {
            chunks,
            next: 0,
            task: IntervalTask::new(period),
            sink,
            state: GeneratorState::Idle,
        }
    }

    /// Begin delivery; the first chunk is due one period after `now`.
    ///
    /// Returns false unless the generator was idle.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != GeneratorState::Idle || !self.task.start(now) {
            return false;
        }
        self.state = GeneratorState::Running;
        info!(
            chunks = self.chunks.len(),
            period_ms = self.task.period().as_millis() as u64,
            "Generator started"
        );
        true
    }

    /// Deliver every chunk whose tick has come due by `now`.
    ///
    /// One chunk per elapsed tick, in order. Completion is reported on the
    /// same tick as the final chunk (immediately on the first tick when there
    /// are no chunks). Returns the number of chunks delivered.
    pub fn poll(&mut self, now: Instant) -> usize {
        if self.state != GeneratorState::Running {
            return 0;
        }
        let ticks = self.task.poll_due(now) as usize;
        let mut delivered = 0;
        for _ in 0..ticks {
            if let Some(chunk) = self.chunks.get(self.next) {
                self.sink.on_chunk(chunk);
                self.next += 1;
                delivered += 1;
            }
            if self.next >= self.chunks.len() {
                self.complete();
                break;
            }
        }
        if delivered > 0 {
            trace!(delivered, next = self.next, "Delivered chunks");
        }
        delivered
    }

    /// Halt delivery. Safe to call any number of times, in any state.
    ///
    /// Completion is not reported for a stopped generator. Returns true only
    /// if this call stopped a running generator.
    pub fn stop(&mut self) -> bool {
        let was_active = self.task.cancel();
        if self.state == GeneratorState::Running {
            self.state = GeneratorState::Stopped;
            debug!(delivered = self.next, total = self.chunks.len(), "Generator stopped");
            return true;
        }
        if self.state == GeneratorState::Idle {
            self.state = GeneratorState::Stopped;
        }
        was_active
    }

    fn complete(&mut self) {
        self.task.cancel();
        self.state = GeneratorState::Completed;
        self.sink.on_complete();
        info!(chunks = self.chunks.len(), "Generator completed");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Whether chunks are still being delivered.
    pub fn is_running(&self) -> bool {
        self.state == GeneratorState::Running
    }

    /// Deadline of the next tick while running.
    pub fn next_due(&self) -> Option<Instant> {
        self.task.next_due()
    }

    /// Number of chunks delivered so far.
    pub fn delivered(&self) -> usize {
        self.next
    }

    /// Total number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if there are no chunks at all.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The sink receiving output.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
