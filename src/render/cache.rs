//! Per-row memoization and segment memoization (§4.3).
//!
//! Two distinct caches, both keyed by `rowId`:
//! - [`RowRenderCache`] memoizes the cells→runs step, bounded and evicted
//!   LRU (~800 rows).
//! - [`SegmentCache`] memoizes the runs→segments step, keyed by `(runs,
//!   cols)` equality so a cursor-only redraw (runs and cols unchanged)
//!   reuses the previous segmentation without re-normalizing.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::render::run::Run;
use crate::render::segment::Segment;

/// Default row-render cache capacity (§4.3: "bounded (≈800 entries)").
pub const DEFAULT_ROW_CACHE_CAPACITY: usize = 800;

/// A memoized cells→runs result for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRowRender {
    /// The row's assembled runs.
    pub runs: Vec<Run>,
    /// Column count the runs were assembled against.
    pub cols: u16,
    /// Synthesized key capturing this row's normalized selection bounds, if
    /// any (empty string when unselected).
    pub selection_key: String,
}

/// LRU-bounded cache from `rowId` to its memoized run assembly.
///
/// Implemented over an [`IndexMap`] rather than a dedicated LRU crate: a
/// cache hit re-inserts the entry (moving it to the most-recently-used end),
/// and eviction always removes from the front. With the ~800-entry bound
/// from §4.3 this is a handful of entries worth of pointer shuffling per
/// access, not a hot path worth a dependency.
#[derive(Debug)]
pub struct RowRenderCache {
    entries: IndexMap<u64, CachedRowRender>,
    capacity: usize,
}

impl RowRenderCache {
    /// A cache bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        RowRenderCache { entries: IndexMap::new(), capacity }
    }

    /// Look up `row_id`'s memoized runs, valid only if `cols` and
    /// `selection_key` match what it was cached under. A hit touches the
    /// entry to the most-recently-used position.
    pub fn get(&mut self, row_id: u64, cols: u16, selection_key: &str) -> Option<Vec<Run>> {
        let matches = self
            .entries
            .get(&row_id)
            .is_some_and(|cached| cached.cols == cols && cached.selection_key == selection_key);
        if !matches {
            return None;
        }
        // Touch: move to the back (most-recently-used end).
        let (_, cached) = self.entries.shift_remove_entry(&row_id)?;
        let runs = cached.runs.clone();
        self.entries.insert(row_id, cached);
        Some(runs)
    }

    /// Insert (or overwrite) `row_id`'s memoized runs, evicting the
    /// least-recently-used entry if this pushes the cache past capacity.
    pub fn insert(&mut self, row_id: u64, cols: u16, selection_key: String, runs: Vec<Run>) {
        self.entries.shift_remove(&row_id);
        self.entries.insert(row_id, CachedRowRender { runs, cols, selection_key });
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    /// Invalidate one row, as done for every `rowId` in a delta's
    /// `dirtyRows` (§4.3).
    pub fn invalidate(&mut self, row_id: u64) {
        self.entries.shift_remove(&row_id);
    }

    /// Flush the entire cache, as done when `(paneId, cols, altScreen,
    /// theme)` change (§4.3).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of rows currently memoized.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memoizes the runs→segments normalization per row, keyed by `(runs,
/// cols)` equality so an update that only moves the cursor - runs and cols
/// both unchanged - reuses the previous segmentation (§4.3).
#[derive(Debug, Default)]
pub struct SegmentCache {
    entries: FxHashMap<u64, (Vec<Run>, u16, Vec<Segment>)>,
}

impl SegmentCache {
    /// An empty cache.
    pub fn new() -> Self {
        SegmentCache { entries: FxHashMap::default() }
    }

    /// Return the memoized segmentation for `row_id` if its stored `(runs,
    /// cols)` matches, otherwise build it with `build`, cache it, and return
    /// it.
    pub fn get_or_build(
        &mut self,
        row_id: u64,
        runs: &[Run],
        cols: u16,
        build: impl FnOnce() -> Vec<Segment>,
    ) -> Vec<Segment> {
        if let Some((cached_runs, cached_cols, segments)) = self.entries.get(&row_id) {
            if cached_runs.as_slice() == runs && *cached_cols == cols {
                return segments.clone();
            }
        }
        let segments = build();
        self.entries.insert(row_id, (runs.to_vec(), cols, segments.clone()));
        segments
    }

    /// Invalidate one row's memoized segmentation.
    pub fn invalidate(&mut self, row_id: u64) {
        self.entries.remove(&row_id);
    }

    /// Flush the entire cache.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::run::{GlyphRange, RangeKind, RunKey};
    use crate::pane::style_table::CanonicalStyleId;

    fn sample_run(text: &str) -> Run {
        Run {
            key: RunKey { style_id: CanonicalStyleId(0), selected: false, bg_override: None, hyperlink: None },
            ranges: vec![GlyphRange { kind: RangeKind::Plain, text: text.to_string(), cols: text.len() as u16 }],
            cols: text.len() as u16,
        }
    }

    #[test]
    fn hits_on_matching_cols_and_selection_key() {
        let mut cache = RowRenderCache::new(10);
        cache.insert(1, 80, String::new(), vec![sample_run("hi")]);
        assert!(cache.get(1, 80, "").is_some());
    }

    #[test]
    fn misses_on_selection_key_change() {
        let mut cache = RowRenderCache::new(10);
        cache.insert(1, 80, String::new(), vec![sample_run("hi")]);
        assert!(cache.get(1, 80, "3:5").is_none());
    }

    #[test]
    fn evicts_least_recently_used_past_capacity() {
        let mut cache = RowRenderCache::new(2);
        cache.insert(1, 80, String::new(), vec![sample_run("a")]);
        cache.insert(2, 80, String::new(), vec![sample_run("b")]);
        cache.insert(3, 80, String::new(), vec![sample_run("c")]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(1, 80, "").is_none());
        assert!(cache.get(3, 80, "").is_some());
    }

    #[test]
    fn invalidate_drops_single_row() {
        let mut cache = RowRenderCache::new(10);
        cache.insert(1, 80, String::new(), vec![sample_run("hi")]);
        cache.invalidate(1);
        assert!(cache.is_empty());
    }

    #[test]
    fn segment_cache_reuses_when_runs_and_cols_match() {
        let mut cache = SegmentCache::new();
        let runs = vec![sample_run("hi")];
        let mut build_calls = 0;
        let segs1 = cache.get_or_build(1, &runs, 2, || {
            build_calls += 1;
            vec![]
        });
        let segs2 = cache.get_or_build(1, &runs, 2, || {
            build_calls += 1;
            vec![]
        });
        assert_eq!(segs1, segs2);
        assert_eq!(build_calls, 1);
    }
}
