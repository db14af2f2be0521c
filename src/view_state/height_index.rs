//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Backs the virtualizer's offset math: the offset of row `i` is the sum of
//! the heights of rows `0..i`, and the row under a scroll offset is the first
//! row whose inclusive prefix sum exceeds it.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized (O(n) when the backing tree grows)
//! - `truncate`: O(k log n) for k removed rows
//! - `total`: O(log n)
//! - `len`: O(1)

/// HeightIndex wraps a Fenwick tree for O(log n) prefix sum queries and updates.
///
/// Keeps a plain copy of every height next to the tree so that single
/// heights can be read in O(1) and the tree can be rebuilt when it grows.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    /// Slots at or beyond `heights.len()` always represent height 0.
    tree: Vec<i64>,
    /// Height of every live row.
    heights: Vec<u32>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows before regrowth.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vchat::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Height of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> u32 {
        self.heights[index]
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vchat::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// index.set(0, 10);
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: u32) {
        assert!(
            index < self.heights.len(),
            "index {} out of bounds (len: {})",
            index,
            self.heights.len()
        );

        let delta = i64::from(height) - i64::from(self.heights[index]);
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vchat::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(3);
    /// index.push(4);
    /// index.push(5);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> u64 {
        assert!(
            index < self.heights.len(),
            "index {} out of bounds (len: {})",
            index,
            self.heights.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        u64::try_from(sum).unwrap_or(0)
    }

    /// Offset of the top edge of row `index`: the sum of all heights before it.
    ///
    /// `offset_of(len())` is the total height.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn offset_of(&self, index: usize) -> u64 {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns the index of the row containing the given vertical offset.
    ///
    /// # Returns
    ///
    /// - `Some(index)` if there exists an index where `prefix_sum(index) > value`
    /// - `None` if `value >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use vchat::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(10);  // [0..10)
    /// index.push(20);  // [10..30)
    /// index.push(15);  // [30..45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(5), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(29), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: u64) -> Option<usize> {
        let mut left = 0;
        let mut right = self.heights.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.heights.len()).then_some(left)
    }

    /// Returns the total cumulative height of all rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vchat::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// assert_eq!(index.total(), 0);
    /// index.push(5);
    /// index.push(3);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn total(&self) -> u64 {
        self.offset_of(self.heights.len())
    }

    /// Returns the number of rows in the index.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index contains no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a new row with the given height.
    ///
    /// When the backing tree is full it is rebuilt at double size, because
    /// new Fenwick slots must cover partial sums of existing rows.
    pub fn push(&mut self, height: u32) {
        let idx = self.heights.len();
        self.heights.push(height);

        if idx >= self.tree.len() {
            self.rebuild(self.tree.len().max(1) * 2);
        } else {
            fenwick::array::update(&mut self.tree, idx, i64::from(height));
        }
    }

    /// Drops every row at or after `len`.
    ///
    /// Removed rows are zeroed in the tree so later pushes start clean.
    pub fn truncate(&mut self, len: usize) {
        while self.heights.len() > len {
            let idx = self.heights.len() - 1;
            let height = self.heights[idx];
            if height != 0 {
                fenwick::array::update(&mut self.tree, idx, -i64::from(height));
            }
            self.heights.pop();
        }
    }

    /// Clears all rows. Retains allocated capacity.
    pub fn clear(&mut self) {
        self.heights.clear();
        self.tree.iter_mut().for_each(|slot| *slot = 0);
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity.max(self.heights.len()), 0);
        for (idx, &height) in self.heights.iter().enumerate() {
            if height != 0 {
                fenwick::array::update(&mut self.tree, idx, i64::from(height));
            }
        }
    }
}
