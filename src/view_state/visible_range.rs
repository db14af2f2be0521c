//! Visible range calculation.
//!
//! Two implementations of the same function:
//!
//! - [`visible_range`] walks cumulative heights from row 0 and stops once the
//!   running offset passes the bottom edge of the viewport. O(n) in the rows
//!   above the viewport, usable with any height function.
//! - [`visible_range_indexed`] answers the same query from a [`HeightIndex`]
//!   with two binary searches. O(log² n).
//!
//! Both return identical results for identical heights.

use super::height_index::HeightIndex;

/// Default number of extra rows rendered above and below the viewport.
pub const DEFAULT_OVERSCAN: usize = 2;

/// Inclusive range of row indices to render.
///
/// # Invariants
/// - `first <= last`
/// - `last < item_count` of the list it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// Index of the first row to render (inclusive).
    pub first: usize,
    /// Index of the last row to render (inclusive).
    pub last: usize,
}

impl VisibleRange {
    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false: a range holds at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies in the range.
    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// Iterate over the row indices in order.
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }

    fn with_overscan(first: usize, last: usize, overscan: usize, item_count: usize) -> Self {
        Self {
            first: first.saturating_sub(overscan),
            last: last.saturating_add(overscan).min(item_count - 1),
        }
    }
}

/// Compute the rows intersecting `[scroll_offset, scroll_offset + container_height)`,
/// widened by `overscan` rows on each side and clamped to `[0, item_count - 1]`.
///
/// `first` is the row whose span contains `scroll_offset` (the last row if the
/// offset is past the end). `last` is the final row whose top edge is above
/// the viewport's bottom edge. A zero `container_height` is treated as 1.
///
/// Returns `None` for an empty list.
///
/// # Examples
///
/// ```
/// # use vchat::view_state::visible_range::visible_range;
/// let heights = [10u32, 10, 10, 10, 10];
/// let range = visible_range(15, 10, heights.len(), 0, |i| heights[i]).unwrap();
/// assert_eq!((range.first, range.last), (1, 2));
/// ```
pub fn visible_range<F>(
    scroll_offset: u64,
    container_height: u64,
    item_count: usize,
    overscan: usize,
    mut height_of: F,
) -> Option<VisibleRange>
where
    F: FnMut(usize) -> u32,
{
    if item_count == 0 {
        return None;
    }
    let bottom = scroll_offset.saturating_add(container_height.max(1));

    let mut offset = 0u64;
    let mut first = None;
    let mut last = 0;
    for i in 0..item_count {
        if offset >= bottom {
            break;
        }
        last = i;
        offset += u64::from(height_of(i));
        if first.is_none() && offset > scroll_offset {
            first = Some(i);
        }
    }
    let first = first.unwrap_or(item_count - 1);
    let last = last.max(first);

    Some(VisibleRange::with_overscan(first, last, overscan, item_count))
}

/// [`visible_range`] answered from prefix sums.
pub fn visible_range_indexed(
    index: &HeightIndex,
    scroll_offset: u64,
    container_height: u64,
    overscan: usize,
) -> Option<VisibleRange> {
    let item_count = index.len();
    if item_count == 0 {
        return None;
    }
    let bottom_row = scroll_offset.saturating_add(container_height.max(1) - 1);

    let first = index.lower_bound(scroll_offset).unwrap_or(item_count - 1);
    let last = index
        .lower_bound(bottom_row)
        .unwrap_or(item_count - 1)
        .max(first);

    Some(VisibleRange::with_overscan(first, last, overscan, item_count))
}
