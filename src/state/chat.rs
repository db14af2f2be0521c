//! Chat session state.
//!
//! Owns the message store, the viewport virtualizer, the auto-scroll
//! controller and the running generator, and wires them in the order
//! generator → store → virtualizer → auto-scroll. Time is always passed in.

use super::auto_scroll::{AutoScrollController, DEFAULT_NEAR_BOTTOM_THRESHOLD};
use super::message_store::MessageStore;
use super::scroll_handler;
use crate::model::{KeyAction, Message, NewMessage};
use crate::source::{prepare_chunks, ChunkGenerator, StreamEvent, DEFAULT_TARGET_WORDS, DEFAULT_TICK};
use crate::view_state::{
    HeightCache, HeightEstimator, HeightParams, HeightRefresh, Virtualizer, DEFAULT_OVERSCAN,
};
use serde::Deserialize;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Prompt used when Enter is pressed on an empty input line.
pub const DEFAULT_PROMPT: &str = "Generate a long response";

/// How the message list is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListStrategy {
    /// Format and draw only the visible rows plus overscan.
    #[default]
    Virtualized,
    /// Format every row on every frame.
    Simple,
}

impl ListStrategy {
    /// The other strategy.
    pub fn toggled(self) -> Self {
        match self {
            Self::Virtualized => Self::Simple,
            Self::Simple => Self::Virtualized,
        }
    }
}

impl fmt::Display for ListStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Virtualized => f.write_str("virtualized"),
            Self::Simple => f.write_str("simple"),
        }
    }
}

impl std::str::FromStr for ListStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "virtualized" | "virtual" => Ok(Self::Virtualized),
            "simple" => Ok(Self::Simple),
            other => Err(format!(
                "unknown list strategy '{other}' (expected virtualized or simple)"
            )),
        }
    }
}

/// Tunables of a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    /// Period between chunks.
    pub tick: Duration,
    /// Words per generated response.
    pub target_words: usize,
    /// PRNG seed for responses; `None` picks a random one per session.
    pub seed: Option<u64>,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// Near-bottom threshold in rows.
    pub near_bottom_threshold: u64,
    /// Height heuristic constants.
    pub heights: HeightParams,
    /// When cached heights of existing rows are re-estimated.
    pub height_refresh: HeightRefresh,
    /// Initial list strategy.
    pub strategy: ListStrategy,
    /// Render content as markdown (otherwise plain text).
    pub markdown: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            target_words: DEFAULT_TARGET_WORDS,
            seed: None,
            overscan: DEFAULT_OVERSCAN,
            near_bottom_threshold: DEFAULT_NEAR_BOTTOM_THRESHOLD,
            heights: HeightParams::default(),
            height_refresh: HeightRefresh::default(),
            strategy: ListStrategy::default(),
            markdown: true,
        }
    }
}

/// Everything the chat widget knows, minus the terminal.
pub struct ChatState {
    tick: Duration,
    target_words: usize,
    seed: u64,
    responses: u64,
    store: MessageStore,
    virtualizer: Virtualizer,
    follow: AutoScrollController,
    generator: Option<ChunkGenerator<Sender<StreamEvent>>>,
    events_tx: Sender<StreamEvent>,
    events_rx: Receiver<StreamEvent>,
    received: usize,
    input: String,
    strategy: ListStrategy,
    markdown: bool,
}

impl ChatState {
    /// Fresh session with no messages.
    pub fn new(settings: ChatSettings) -> Self {
        let cache = HeightCache::new(HeightEstimator::new(settings.heights), settings.height_refresh);
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            tick: settings.tick,
            target_words: settings.target_words,
            seed: settings.seed.unwrap_or_else(rand::random),
            responses: 0,
            store: MessageStore::new(),
            virtualizer: Virtualizer::new(cache, settings.overscan),
            follow: AutoScrollController::new(settings.near_bottom_threshold),
            generator: None,
            events_tx,
            events_rx,
            received: 0,
            input: String::new(),
            strategy: settings.strategy,
            markdown: settings.markdown,
        }
    }

    /// Message store (read-only).
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Messages in order.
    pub fn messages(&self) -> &[Message] {
        self.store.snapshot()
    }

    /// Viewport virtualizer (read-only).
    pub fn virtualizer(&self) -> &Virtualizer {
        &self.virtualizer
    }

    /// Auto-scroll controller (read-only).
    pub fn follow(&self) -> &AutoScrollController {
        &self.follow
    }

    /// Whether a response is streaming.
    pub fn is_generating(&self) -> bool {
        self.store.is_generating()
    }

    /// Current input line.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current list strategy.
    pub fn strategy(&self) -> ListStrategy {
        self.strategy
    }

    /// Switch between virtualized and simple rendering.
    pub fn toggle_strategy(&mut self) -> ListStrategy {
        self.strategy = self.strategy.toggled();
        info!(strategy = %self.strategy, "List strategy changed");
        self.strategy
    }

    /// Whether content renders as markdown.
    pub fn markdown(&self) -> bool {
        self.markdown
    }

    /// Type a character into the input line. Ignored while generating.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.is_generating() || c.is_control() {
            return false;
        }
        self.input.push(c);
        true
    }

    /// Delete the last input character. Ignored while generating.
    pub fn delete_char(&mut self) -> bool {
        !self.is_generating() && self.input.pop().is_some()
    }

    /// Submit the input line and start streaming a response.
    ///
    /// Appends the prompt as a user message (or [`DEFAULT_PROMPT`] if the
    /// input is blank) and an empty streaming assistant message, then starts
    /// a generator. Submitting counts as an explicit return to the bottom.
    /// Returns false, doing nothing, while a response is already streaming.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.is_generating() {
            debug!("Submit ignored while generating");
            return false;
        }
        let prompt = match self.input.trim() {
            "" => DEFAULT_PROMPT.to_string(),
            text => text.to_string(),
        };
        self.input.clear();

        self.store.append(NewMessage::user(prompt));
        self.store.append(NewMessage::streaming_assistant());
        self.store.set_generating(true);
        self.received = 0;
        self.follow.resume();

        let seed = self.seed.wrapping_add(self.responses);
        self.responses += 1;
        let chunks = prepare_chunks(self.target_words, seed);
        let mut generator = ChunkGenerator::new(chunks, self.tick, self.events_tx.clone());
        generator.start(now);
        self.generator = Some(generator);

        self.refresh();
        true
    }

    /// Stop the running response.
    ///
    /// Safe to call at any time. The streaming message keeps the content
    /// received so far. Returns true if a response was streaming.
    pub fn stop(&mut self) -> bool {
        if let Some(mut generator) = self.generator.take() {
            generator.stop();
        }
        // chunks already queued belong to the stopped response
        self.events_rx.try_iter().for_each(drop);
        if !self.is_generating() {
            return false;
        }
        self.finish();
        info!(bytes = self.received, "Generation stopped");
        true
    }

    /// Deadline of the next generator tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.generator.as_ref().and_then(ChunkGenerator::next_due)
    }

    /// Advance the generator to `now` and apply what it delivered.
    ///
    /// Returns true if the message list changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(generator) = self.generator.as_mut() {
            generator.poll(now);
        }
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            changed = true;
        }
        if changed {
            self.refresh();
        }
        changed
    }

    fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Chunk(chunk) => {
                self.received += chunk.len();
                self.store.append_to_last(&chunk);
            }
            StreamEvent::Complete => {
                self.generator = None;
                self.finish();
                info!(bytes = self.received, "Response complete");
            }
        }
    }

    fn finish(&mut self) {
        self.store.set_generating(false);
        self.store.finish_streaming();
        self.refresh();
    }

    /// Re-sync heights with the store and let auto-scroll react.
    pub fn refresh(&mut self) {
        self.virtualizer.sync(self.store.snapshot());
        self.follow
            .on_list_update(self.store.snapshot(), &mut self.virtualizer);
        self.virtualizer.clamp_scroll();
    }

    /// Report the message pane size. Returns true if layout changed.
    pub fn set_viewport(&mut self, width: u16, height: u16) -> bool {
        let height_changed = self.virtualizer.container_height() != height.max(1);
        self.virtualizer.set_container_height(height);
        let width_changed = self.virtualizer.set_wrap_width(width);
        if height_changed || width_changed {
            debug!(width, height, "Viewport changed");
            self.refresh();
            return true;
        }
        false
    }

    /// Apply a scroll key action. Returns true if it was a scroll action.
    pub fn scroll(&mut self, action: KeyAction) -> bool {
        scroll_handler::handle_scroll_action(&mut self.virtualizer, &mut self.follow, action).is_some()
    }

    /// Apply mouse wheel notches (negative is up).
    pub fn wheel(&mut self, notches: i64) {
        scroll_handler::handle_wheel(&mut self.virtualizer, &mut self.follow, notches);
    }
}
