//! View-state layer - row heights, offsets, and viewport virtualization
//!
//! Pure and terminal-independent. Heights are in terminal rows.
//!
//! # Module Structure
//!
//! - `height_index`: HeightIndex - O(log n) prefix sums via Fenwick tree
//! - `height_estimator`: HeightEstimator - content-based row height heuristic
//! - `height_cache`: HeightCache - position-keyed memo with explicit invalidation
//! - `visible_range`: VisibleRange and the two range computations
//! - `virtualizer`: Virtualizer - scroll offset, container height, scroll-to-index

pub mod height_cache;
pub mod height_estimator;
pub mod height_index;
pub mod virtualizer;
pub mod visible_range;

pub use height_cache::{HeightCache, HeightRefresh, SyncReport};
pub use height_estimator::{HeightEstimator, HeightParams};
pub use height_index::HeightIndex;
pub use virtualizer::{Align, ScrollEvent, ScrollTarget, Virtualizer};
pub use visible_range::{visible_range, visible_range_indexed, VisibleRange, DEFAULT_OVERSCAN};
