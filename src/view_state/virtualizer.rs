//! Viewport virtualizer: maps row indices to vertical offsets and back.
//!
//! Owns the height cache, the scroll offset, and the container height. Every
//! scroll it performs is reported as a [`ScrollEvent`] so the auto-scroll
//! controller can tell programmatic scrolls from user scrolls.

use super::height_cache::{HeightCache, SyncReport};
use super::visible_range::{visible_range_indexed, VisibleRange};
use crate::model::Message;
use tracing::trace;

/// Where a row should land in the viewport after [`Virtualizer::scroll_to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Row top at viewport top.
    Start,
    /// Row bottom at viewport bottom. Used to follow the end of the list.
    End,
    /// Row centered in the viewport.
    Center,
    /// Scroll the minimum distance that brings the row fully into view.
    Auto,
}

/// A change of scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    /// Offset after the scroll.
    pub offset: u64,
    /// True if the scroll was issued by code rather than the user.
    pub programmatic: bool,
}

/// Something that can be told to bring a row into view.
pub trait ScrollTarget {
    /// Scroll so that row `index` is positioned per `align`.
    ///
    /// No-op on an empty list.
    fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<ScrollEvent>;
}

/// Viewport state over a list of variable-height rows.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    heights: HeightCache,
    scroll_offset: u64,
    container_height: u16,
    overscan: usize,
}

impl Virtualizer {
    /// New virtualizer at offset 0 with a one-row container.
    pub fn new(heights: HeightCache, overscan: usize) -> Self {
        Self {
            heights,
            scroll_offset: 0,
            container_height: 1,
            overscan,
        }
    }

    /// Update the viewport height. Zero is stored as 1.
    pub fn set_container_height(&mut self, height: u16) {
        self.container_height = height.max(1);
    }

    /// Update the width rows wrap at. Returns true if cached heights were dropped.
    pub fn set_wrap_width(&mut self, width: u16) -> bool {
        self.heights.set_wrap_width(Some(width))
    }

    /// Viewport height in rows.
    pub fn container_height(&self) -> u16 {
        self.container_height
    }

    /// Current scroll offset in rows.
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Rows of overscan on each side of the visible range.
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Bring cached heights up to date with a message snapshot.
    pub fn sync(&mut self, messages: &[Message]) -> SyncReport {
        self.heights.sync(messages)
    }

    /// Discard cached heights at and after `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        self.heights.invalidate_from(index);
    }

    /// Height cache backing the offsets.
    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    /// Number of rows with known heights.
    pub fn item_count(&self) -> usize {
        self.heights.len()
    }

    /// Total scrollable height.
    pub fn total_height(&self) -> u64 {
        self.heights.total()
    }

    /// Largest offset that still fills the viewport.
    pub fn max_scroll(&self) -> u64 {
        self.total_height()
            .saturating_sub(u64::from(self.container_height))
    }

    /// Rows to render for the current offset, overscan included.
    pub fn range(&self) -> Option<VisibleRange> {
        visible_range_indexed(
            self.heights.heights(),
            self.scroll_offset,
            u64::from(self.container_height),
            self.overscan,
        )
    }

    /// Row top offset and height, for placing row `index` on screen.
    pub fn row_span(&self, index: usize) -> Option<(u64, u32)> {
        Some((self.heights.offset_of(index)?, self.heights.height_of(index)?))
    }

    /// User scroll to an absolute offset, clamped to `[0, max_scroll]`.
    pub fn scroll_to(&mut self, offset: u64) -> ScrollEvent {
        self.scroll_offset = offset.min(self.max_scroll());
        ScrollEvent {
            offset: self.scroll_offset,
            programmatic: false,
        }
    }

    /// User scroll by a signed number of rows.
    pub fn scroll_by(&mut self, delta: i64) -> ScrollEvent {
        let target = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        };
        self.scroll_to(target)
    }

    /// Re-clamp the offset after heights or the container changed.
    pub fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Programmatic scroll so that row `index` sits per `align`.
    ///
    /// `index` past the end is clamped to the last row. The resulting offset
    /// is clamped to `[0, max_scroll]`. Returns `None` on an empty list.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<ScrollEvent> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        let index = index.min(count - 1);
        let (top, height) = self.row_span(index)?;
        let height = u64::from(height);
        let container = u64::from(self.container_height);
        let bottom = top + height;

        let target = match align {
            Align::Start => top,
            Align::End => bottom.saturating_sub(container),
            Align::Center => (top + height / 2).saturating_sub(container / 2),
            Align::Auto => {
                if top < self.scroll_offset || height > container {
                    top
                } else if bottom > self.scroll_offset + container {
                    bottom - container
                } else {
                    self.scroll_offset
                }
            }
        };
        self.scroll_offset = target.min(self.max_scroll());
        trace!(index, ?align, offset = self.scroll_offset, "Scrolled to index");
        Some(ScrollEvent {
            offset: self.scroll_offset,
            programmatic: true,
        })
    }
}

impl ScrollTarget for Virtualizer {
    fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<ScrollEvent> {
        Virtualizer::scroll_to_index(self, index, align)
    }
}

#[cfg(test)]
#[path = "virtualizer_tests.rs"]
mod tests;
