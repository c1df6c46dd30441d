//! `syncNeeded` policy and `buildViewportSnapshot` (§4.2).

use crate::error::CoreError;
use crate::pane::cell_model::Cell;
use crate::pane::state::PaneState;
use crate::wire::inbound::{WireCursor, WireScrollback, WireSelection};
use crate::wire::outbound::ClientMessage;

/// The outcome of checking a delta's generation bounds against a pane's
/// current state, before attempting to apply it.
#[derive(Debug)]
pub enum SyncOutcome {
    /// `fromGen == generation`: the caller should proceed to
    /// [`crate::pane::delta::apply_delta`].
    Apply,
    /// The pane is behind (or ahead, in the "gap" sense) and must resync;
    /// `message` is the `sync` request to send, `reason` the classified
    /// error for logging.
    RequestSync { message: ClientMessage, reason: CoreError },
    /// The delta is stale and not also behind the server's target
    /// generation; drop it silently (beyond logging `reason`).
    Drop { reason: CoreError },
}

/// Decide what to do with an incoming delta's generation bounds (§4.2).
///
/// Increments `state.resync_count` when a resync is requested - this is
/// the one piece of state mutation this policy function performs; it never
/// touches the row cache or style table.
pub fn sync_needed(pane_id: u32, state: &mut PaneState, from_gen: u32, gen: u32) -> SyncOutcome {
    let generation = state.generation;

    if from_gen == generation {
        return SyncOutcome::Apply;
    }

    let sync_message = || ClientMessage::Sync { pane_id, gen: generation, min_row_id: state.min_row_id() };

    if from_gen > generation {
        state.resync_count += 1;
        return SyncOutcome::RequestSync {
            message: sync_message(),
            reason: CoreError::ProtocolGap { from_gen, generation },
        };
    }

    // from_gen < generation.
    if gen > generation {
        state.resync_count += 1;
        SyncOutcome::RequestSync {
            message: sync_message(),
            reason: CoreError::ProtocolStaleDelta { from_gen, generation },
        }
    } else {
        SyncOutcome::Drop { reason: CoreError::ProtocolStaleDelta { from_gen, generation } }
    }
}

/// A render-ready reconstruction of a pane's current viewport (§4.2).
///
/// Unlike the wire `snapshot`/`delta` messages, `cells` carries fully
/// resolved [`Cell`]s (grapheme tails and hyperlink URLs already joined in)
/// rather than separate `graphemes`/`hyperlinks` side maps - those maps
/// exist on the wire only to avoid repeating codepoint arrays and URLs
/// across identically-styled cells; once decoded into the semantic model
/// there's no remaining reason to keep them split out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSnapshot {
    /// Pane identifier.
    pub pane_id: u32,
    /// Column count.
    pub cols: u16,
    /// Row count.
    pub rows: u16,
    /// Concatenated cells, row-major, `rows * cols` entries.
    pub cells: Vec<Cell>,
    /// Cursor state.
    pub cursor: WireCursor,
    /// Whether the alternate screen is active.
    pub alt_screen: bool,
    /// Scrollback position.
    pub scrollback: WireScrollback,
    /// Current selection, if any.
    pub selection: Option<WireSelection>,
    /// Pane title.
    pub title: Option<String>,
}

/// Build a [`TerminalSnapshot`] from `state`'s current viewport, filling
/// any row missing from the cache with blank cells (mirrors the transient
/// blank-row behavior [`crate::pane::delta::apply_delta`] already applies
/// to the cache itself, as a defensive fallback if this is ever called
/// before the cache catches up).
pub fn build_viewport_snapshot(pane_id: u32, state: &PaneState) -> TerminalSnapshot {
    let cols = usize::from(state.cols);
    let mut cells = Vec::with_capacity(cols * usize::from(state.rows));
    for &row_id in &state.row_ids {
        match state.row_cache.get(row_id) {
            Some(row) => cells.extend(row.cells.iter().cloned()),
            None => cells.extend((0..cols).map(|_| Cell::default_blank())),
        }
    }
    TerminalSnapshot {
        pane_id,
        cols: state.cols,
        rows: state.rows,
        cells,
        cursor: state.cursor,
        alt_screen: state.alt_screen,
        scrollback: state.scrollback,
        selection: state.selection,
        title: state.title.clone(),
    }
}
