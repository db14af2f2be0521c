//! Heuristic row height estimation.
//!
//! Heights are in terminal rows. A row is a role header line, the content
//! lines, and one blank separator line, so the default base is 2.

use unicode_width::UnicodeWidthStr;

/// Fence marker that opens and closes a code block.
const FENCE: &str = "```";

/// Tunable constants of the height heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightParams {
    /// Rows every message takes regardless of content.
    pub base: u32,
    /// Rows added per content line.
    pub per_line: u32,
    /// Rows added per fenced code block.
    pub per_code_block: u32,
    /// Lower clamp of the estimate.
    pub min: u32,
    /// Upper clamp of the estimate.
    pub max: u32,
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            base: 2,
            per_line: 1,
            per_code_block: 2,
            min: 3,
            max: 2000,
        }
    }
}

impl HeightParams {
    /// Repair inconsistent bounds: `min` is at least 1 and `max` at least `min`.
    pub fn normalized(self) -> Self {
        let min = self.min.max(1);
        Self {
            min,
            max: self.max.max(min),
            ..self
        }
    }
}

/// Estimates the rendered height of a message from its content alone.
///
/// Deterministic for a given content and wrap width; never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightEstimator {
    params: HeightParams,
    wrap_width: Option<u16>,
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self::new(HeightParams::default())
    }
}

impl HeightEstimator {
    /// Create an estimator that counts one line per newline-delimited segment.
    pub fn new(params: HeightParams) -> Self {
        Self {
            params: params.normalized(),
            wrap_width: None,
        }
    }

    /// Parameters in effect (after normalization).
    pub fn params(&self) -> HeightParams {
        self.params
    }

    /// Current wrap width, if any.
    pub fn wrap_width(&self) -> Option<u16> {
        self.wrap_width
    }

    /// Set the width long segments wrap at. `None` or zero disables wrapping.
    ///
    /// Returns true if the width changed, in which case earlier estimates
    /// are no longer comparable.
    pub fn set_wrap_width(&mut self, width: Option<u16>) -> bool {
        let width = width.filter(|&w| w > 0);
        if self.wrap_width == width {
            return false;
        }
        self.wrap_width = width;
        true
    }

    /// Estimated height of `content` in rows, within `[min, max]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vchat::view_state::height_estimator::{HeightEstimator, HeightParams};
    /// let estimator = HeightEstimator::new(HeightParams::default());
    /// // header + separator + 3 lines
    /// assert_eq!(estimator.estimate("a\nb\nc"), 5);
    /// ```
    pub fn estimate(&self, content: &str) -> u32 {
        let p = &self.params;
        let raw = u64::from(p.base)
            + u64::from(line_count(content, self.wrap_width)) * u64::from(p.per_line)
            + u64::from(code_block_count(content)) * u64::from(p.per_code_block);
        let clamped = raw.clamp(u64::from(p.min), u64::from(p.max));
        // max fits in u32, so the clamp result does too
        u32::try_from(clamped).unwrap_or(p.max)
    }
}

/// Number of display lines in `content`.
///
/// Without a wrap width this is the number of newline-delimited segments
/// (an empty string is one segment). With one, each segment counts
/// `ceil(width / wrap_width)` lines, at least 1.
pub fn line_count(content: &str, wrap_width: Option<u16>) -> u32 {
    let lines: usize = match wrap_width.filter(|&w| w > 0) {
        None => content.split('\n').count(),
        Some(wrap) => {
            let wrap = usize::from(wrap);
            content
                .split('\n')
                .map(|segment| segment.width().div_ceil(wrap).max(1))
                .sum()
        }
    };
    u32::try_from(lines).unwrap_or(u32::MAX)
}

/// Number of complete fenced code blocks: fence markers divided by two.
///
/// Unpaired markers undercount.
pub fn code_block_count(content: &str) -> u32 {
    let fences = content.matches(FENCE).count();
    u32::try_from(fences / 2).unwrap_or(u32::MAX)
}
