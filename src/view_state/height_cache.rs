//! Position-keyed row height memo.
//!
//! Heights are memoized by index. Once estimated, a height stays put until
//! it is explicitly invalidated, the message sequence changes shape, the
//! row stops streaming, or the refresh policy re-estimates the streaming row.

use super::height_estimator::HeightEstimator;
use super::height_index::HeightIndex;
use crate::model::{Message, MessageId};
use serde::Deserialize;
use tracing::{debug, trace};

/// When the cached height of an existing row is re-estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightRefresh {
    /// Only structural changes (insert, remove, reorder, resize) invalidate.
    /// The streaming row keeps the height estimated when it was appended
    /// until it finishes streaming.
    Structural,
    /// Additionally re-estimate the last row whenever its content
    /// fingerprint changes.
    #[default]
    StreamingRow,
}

impl std::str::FromStr for HeightRefresh {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "streaming-row" | "streaming_row" => Ok(Self::StreamingRow),
            other => Err(format!(
                "unknown height refresh policy '{other}' (expected structural or streaming-row)"
            )),
        }
    }
}

/// Cheap structural summary of message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    len: usize,
    newlines: usize,
}

impl Fingerprint {
    /// Fingerprint of a content string.
    pub fn of(content: &str) -> Self {
        Self {
            len: content.len(),
            newlines: content.bytes().filter(|&b| b == b'\n').count(),
        }
    }
}

/// What a [`HeightCache::sync`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// First index whose cached height was discarded, if any.
    pub invalidated_from: Option<usize>,
    /// Number of rows estimated fresh.
    pub estimated: usize,
    /// Whether the last row was re-estimated under [`HeightRefresh::StreamingRow`].
    pub refreshed_last: bool,
    /// Rows re-estimated because they stopped streaming.
    pub settled: usize,
}

impl SyncReport {
    /// True if any offset may have moved.
    pub fn changed(&self) -> bool {
        self.invalidated_from.is_some() || self.estimated > 0 || self.refreshed_last || self.settled > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    id: MessageId,
    fingerprint: Fingerprint,
    streaming: bool,
}

/// Memo of estimated heights by row index, with prefix sums for offsets.
#[derive(Debug, Clone)]
pub struct HeightCache {
    estimator: HeightEstimator,
    refresh: HeightRefresh,
    index: HeightIndex,
    slots: Vec<Slot>,
}

impl HeightCache {
    /// Empty cache using the given estimator and refresh policy.
    pub fn new(estimator: HeightEstimator, refresh: HeightRefresh) -> Self {
        Self {
            estimator,
            refresh,
            index: HeightIndex::new(64),
            slots: Vec::with_capacity(64),
        }
    }

    /// Refresh policy in effect.
    pub fn refresh(&self) -> HeightRefresh {
        self.refresh
    }

    /// The estimator used for new rows.
    pub fn estimator(&self) -> &HeightEstimator {
        &self.estimator
    }

    /// Change the wrap width. A change discards every cached height.
    pub fn set_wrap_width(&mut self, width: Option<u16>) -> bool {
        if self.estimator.set_wrap_width(width) {
            debug!(?width, rows = self.len(), "Wrap width changed, clearing height cache");
            self.clear();
            true
        } else {
            false
        }
    }

    /// Bring the cache in line with a message snapshot.
    ///
    /// Rows whose message identity no longer matches are discarded from the
    /// first mismatch onward. Rows past the end of the cache are estimated.
    /// A row whose message stopped streaming is re-estimated under either
    /// policy. Under [`HeightRefresh::StreamingRow`] the last row is also
    /// re-estimated whenever its fingerprint changed; otherwise content
    /// changes are ignored.
    pub fn sync(&mut self, messages: &[Message]) -> SyncReport {
        let mut report = SyncReport::default();

        let common = self.slots.len().min(messages.len());
        let first_mismatch = (0..common)
            .find(|&i| self.slots[i].id != messages[i].id())
            .unwrap_or(common);
        if first_mismatch < self.slots.len() {
            self.invalidate_from(first_mismatch);
            report.invalidated_from = Some(first_mismatch);
        }

        for (i, message) in messages.iter().enumerate().take(self.slots.len()) {
            if self.slots[i].streaming && !message.is_streaming() {
                let height = self.estimator.estimate(message.content());
                trace!(index = i, height, "Re-estimated finished row");
                self.index.set(i, height);
                self.slots[i].fingerprint = Fingerprint::of(message.content());
                self.slots[i].streaming = false;
                report.settled += 1;
            }
        }

        for message in &messages[self.slots.len()..] {
            let height = self.estimator.estimate(message.content());
            self.index.push(height);
            self.slots.push(Slot {
                id: message.id(),
                fingerprint: Fingerprint::of(message.content()),
                streaming: message.is_streaming(),
            });
            report.estimated += 1;
        }

        if self.refresh == HeightRefresh::StreamingRow && report.estimated == 0 {
            if let Some(last) = messages.last() {
                let i = messages.len() - 1;
                let fingerprint = Fingerprint::of(last.content());
                if self.slots[i].fingerprint != fingerprint {
                    let height = self.estimator.estimate(last.content());
                    self.slots[i].fingerprint = fingerprint;
                    if height != self.index.get(i) {
                        trace!(index = i, height, "Re-estimated streaming row");
                        self.index.set(i, height);
                        report.refreshed_last = true;
                    }
                }
            }
        }

        report
    }

    /// Discard cached heights at and after `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        if index >= self.slots.len() {
            return;
        }
        debug!(from = index, rows = self.slots.len(), "Invalidating cached heights");
        self.index.truncate(index);
        self.slots.truncate(index);
    }

    /// Discard every cached height.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
    }

    /// Number of rows with a cached height.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Cached height of row `index`, if present.
    pub fn height_of(&self, index: usize) -> Option<u32> {
        (index < self.len()).then(|| self.index.get(index))
    }

    /// Top offset of row `index`; `offset_of(len())` is the total height.
    ///
    /// Returns `None` past the end.
    pub fn offset_of(&self, index: usize) -> Option<u64> {
        (index <= self.len()).then(|| self.index.offset_of(index))
    }

    /// Sum of all cached heights.
    pub fn total(&self) -> u64 {
        self.index.total()
    }

    /// Index of the row covering `offset`, or `None` past the end.
    pub fn index_at(&self, offset: u64) -> Option<usize> {
        self.index.lower_bound(offset)
    }

    /// The underlying prefix-sum index.
    pub fn heights(&self) -> &HeightIndex {
        &self.index
    }
}
