//! Per-pane cached state (§3, §4.2): the row cache, generation counter, and
//! bookkeeping the sync engine mutates as snapshots and deltas arrive.

use std::collections::HashMap;

use rustc_hash::FxHashMap;

use crate::pane::cell_model::Cell;
use crate::pane::style_table::{CanonicalStyleId, StyleTable};
use crate::wire::inbound::{WireCursor, WireScrollback, WireSelection};
use crate::wire::rowid::INVALID_ROW_ID;
use crate::wire::style::StyleId;

/// One cached row: resolved cells plus the current viewport's column count
/// at the time it was written (so a stale wide row from a resized pane is
/// never partially reused against a narrower new width).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRow {
    /// Resolved cells, `cols` entries.
    pub cells: Vec<Cell>,
}

/// Cache of row-addressed cell buffers, keyed by stable `rowId` (§3, §9).
#[derive(Debug, Default)]
pub struct RowCache {
    rows: FxHashMap<u64, CachedRow>,
}

impl RowCache {
    /// An empty cache.
    pub fn new() -> Self {
        RowCache { rows: FxHashMap::default() }
    }

    /// Replace the entire cache, as `applySnapshot` does (§4.2: "replace
    /// `rowCache` wholesale").
    pub fn replace_all(&mut self, rows: FxHashMap<u64, CachedRow>) {
        self.rows = rows;
    }

    /// Insert or overwrite a single row, as `applyDelta` does per dirty row.
    pub fn insert(&mut self, row_id: u64, row: CachedRow) {
        self.rows.insert(row_id, row);
    }

    /// Look up a cached row by its stable id.
    pub fn get(&self, row_id: u64) -> Option<&CachedRow> {
        self.rows.get(&row_id)
    }

    /// Number of rows currently cached.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the cache holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The lowest cached rowId, or [`INVALID_ROW_ID`] when the cache is
    /// empty (§3: `minRowId` feeds resync requests).
    pub fn min_row_id(&self) -> u64 {
        self.rows.keys().copied().min().unwrap_or(INVALID_ROW_ID)
    }

    /// Iterate all cached `(rowId, row)` pairs, for GC reference-scanning.
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &CachedRow)> {
        self.rows.iter()
    }
}

/// All state tracked for one pane (§3).
#[derive(Debug)]
pub struct PaneState {
    /// Pane identifier.
    pub pane_id: u32,
    /// Monotonic generation counter.
    pub generation: u32,
    /// Cached rows, keyed by stable rowId.
    pub row_cache: RowCache,
    /// Pane-stable style canonicalization table.
    pub style_table: StyleTable,
    /// The most recently established mapping from per-message wire style
    /// ids to canonical ids (§9). A snapshot replaces this wholesale; a
    /// delta merges new entries in, leaving untouched ids carrying forward
    /// from the previous message, since a delta's `styles` buffer omits
    /// definitions that didn't change.
    pub style_translation: HashMap<StyleId, CanonicalStyleId>,
    /// Current viewport's rowId ordering, `rowIds[y]` for `y in [0, rows)`.
    pub row_ids: Vec<u64>,
    /// Column count.
    pub cols: u16,
    /// Row count.
    pub rows: u16,
    /// Cursor state from the most recent snapshot/delta.
    pub cursor: WireCursor,
    /// Whether the alternate screen is active.
    pub alt_screen: bool,
    /// Scrollback position.
    pub scrollback: WireScrollback,
    /// Current selection, if any.
    pub selection: Option<WireSelection>,
    /// Pane title, if known.
    pub title: Option<String>,
    /// Count of deltas successfully applied.
    pub delta_count: u64,
    /// Count of resyncs triggered (both from `syncNeeded` and from a
    /// snapshot forced by `applySnapshot`).
    pub resync_count: u64,
}

impl PaneState {
    /// A freshly created pane with no generation established yet.
    pub fn new(pane_id: u32) -> Self {
        PaneState {
            pane_id,
            generation: 0,
            row_cache: RowCache::new(),
            style_table: StyleTable::new(),
            style_translation: HashMap::new(),
            row_ids: Vec::new(),
            cols: 0,
            rows: 0,
            cursor: WireCursor {
                x: 0,
                y: 0,
                visible: true,
                style: crate::wire::inbound::CursorShape::Block,
                blink: true,
            },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 0, viewport_top: 0 },
            selection: None,
            title: None,
            delta_count: 0,
            resync_count: 0,
        }
    }

    /// The lowest cached rowId, for resync requests (§3).
    pub fn min_row_id(&self) -> u64 {
        self.row_cache.min_row_id()
    }
}
