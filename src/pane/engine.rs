//! `PaneSyncEngine` (§4.2, §5): owns every pane's state and dispatches
//! incoming snapshot/delta messages to the right one.

use rustc_hash::FxHashMap;

use crate::error::CoreError;
use crate::pane::delta::apply_delta;
use crate::pane::snapshot::apply_snapshot;
use crate::pane::state::PaneState;
use crate::pane::sync::{build_viewport_snapshot, sync_needed, SyncOutcome, TerminalSnapshot};
use crate::wire::inbound::ServerMessage;
use crate::wire::outbound::ClientMessage;

/// What an ingested message produced: a render-ready snapshot, an outbound
/// message the session layer should send (typically a `sync` request), or
/// nothing of note (e.g. a message type this engine doesn't own).
#[derive(Debug)]
pub enum IngestResult {
    /// The pane's viewport changed; here's the render-ready snapshot.
    Updated(TerminalSnapshot),
    /// No cache mutation happened, but an outbound message must be sent
    /// (a resync request).
    Outbound(ClientMessage),
    /// The message was not a snapshot/delta, or was dropped (stale delta
    /// not behind target) - nothing for the caller to do.
    Noop,
}

/// Owns every pane's [`PaneState`] (§3's "Shared-resource policy": the
/// row cache and pane state are owned by the session layer and mutated
/// only by its dispatch logic - this is that owner).
#[derive(Debug, Default)]
pub struct PaneSyncEngine {
    panes: FxHashMap<u32, PaneState>,
}

impl PaneSyncEngine {
    /// An engine with no panes yet.
    pub fn new() -> Self {
        PaneSyncEngine { panes: FxHashMap::default() }
    }

    /// Look up a pane's state, if it exists.
    pub fn pane(&self, pane_id: u32) -> Option<&PaneState> {
        self.panes.get(&pane_id)
    }

    /// Ingest a [`ServerMessage::Snapshot`] or [`ServerMessage::Delta`],
    /// creating the pane's state on first reference. Any other message
    /// variant returns [`IngestResult::Noop`] - this engine is not a
    /// general-purpose message router (that's the session layer's job).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DecodeError`] if a snapshot or delta's side
    /// tables are malformed. The caller should log and continue (§7): no
    /// error here is fatal to the pane, which recovers on the next message.
    pub fn ingest(&mut self, msg: &ServerMessage) -> Result<IngestResult, CoreError> {
        match msg {
            ServerMessage::Snapshot { pane_id, .. } => {
                let pane_id = *pane_id;
                let state = self.panes.entry(pane_id).or_insert_with(|| PaneState::new(pane_id));
                apply_snapshot(state, msg)?;
                Ok(IngestResult::Updated(build_viewport_snapshot(pane_id, state)))
            }
            ServerMessage::Delta { pane_id, from_gen, gen, .. } => {
                let pane_id = *pane_id;
                let (from_gen, gen) = (*from_gen, *gen);
                let state = self.panes.entry(pane_id).or_insert_with(|| PaneState::new(pane_id));
                match sync_needed(pane_id, state, from_gen, gen) {
                    SyncOutcome::Apply => {
                        apply_delta(state, msg)?;
                        Ok(IngestResult::Updated(build_viewport_snapshot(pane_id, state)))
                    }
                    SyncOutcome::RequestSync { message, reason } => {
                        log::warn!("pane {pane_id}: {reason}, requesting resync");
                        Ok(IngestResult::Outbound(message))
                    }
                    SyncOutcome::Drop { reason } => {
                        log::warn!("pane {pane_id}: dropping stale delta: {reason}");
                        Ok(IngestResult::Noop)
                    }
                }
            }
            _ => Ok(IngestResult::Noop),
        }
    }

    /// Remove a pane's state entirely (e.g. on `close_pane`).
    pub fn remove_pane(&mut self, pane_id: u32) {
        self.panes.remove(&pane_id);
    }

    /// Number of panes currently tracked.
    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::cell::{PackedCell, PackedContent, Wide};
    use crate::wire::inbound::{CursorShape, DirtyRow, WireCursor, WireScrollback};
    use crate::wire::rowid::encode_row_ids;
    use crate::wire::style::{encode_style_table, Style, StyleId};

    fn row_bytes(text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|c| {
                PackedCell {
                    content: PackedContent::Codepoint(c as u32),
                    style_id: StyleId(0),
                    wide: Wide::Narrow,
                    protected: false,
                    hyperlink: false,
                }
                .encode()
            })
            .collect()
    }

    fn snapshot(pane_id: u32, gen: u32, row_id: u64, text: &str) -> ServerMessage {
        ServerMessage::Snapshot {
            pane_id,
            gen,
            cols: text.chars().count() as u16,
            rows: 1,
            cursor: WireCursor { x: 0, y: 0, visible: true, style: CursorShape::Block, blink: true },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 1, viewport_top: 0 },
            cells: row_bytes(text),
            styles: encode_style_table(&[(StyleId(0), Style::default())]),
            row_ids: encode_row_ids(&[row_id]),
            graphemes: None,
            hyperlinks: None,
            selection: None,
            title: None,
        }
    }

    #[test]
    fn snapshot_then_delta_updates_viewport() {
        let mut engine = PaneSyncEngine::new();
        let snap_result = engine.ingest(&snapshot(1, 10, 0x42, "Hi!")).unwrap();
        assert!(matches!(snap_result, IngestResult::Updated(_)));

        let delta_msg = ServerMessage::Delta {
            pane_id: 1,
            from_gen: 10,
            gen: 11,
            cols: 3,
            rows: 1,
            cursor: WireCursor { x: 0, y: 0, visible: true, style: CursorShape::Block, blink: true },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 1, viewport_top: 0 },
            dirty_rows: vec![DirtyRow { id: 0x42, cells: row_bytes("Ho!"), graphemes: None, hyperlinks: None }],
            row_ids: encode_row_ids(&[0x42]),
            styles: encode_style_table(&[]),
            selection: None,
            title: None,
        };
        let result = engine.ingest(&delta_msg).unwrap();
        match result {
            IngestResult::Updated(snap) => {
                assert_eq!(snap.cells[0].content.text(), "H");
                assert_eq!(snap.cells[1].content.text(), "o");
            }
            other => panic!("expected Updated, got {other:?}"),
        }
        assert_eq!(engine.pane(1).unwrap().generation, 11);
    }

    #[test]
    fn delta_with_generation_gap_requests_sync_not_apply() {
        let mut engine = PaneSyncEngine::new();
        engine.ingest(&snapshot(1, 3, 0x1, "a")).unwrap();

        let delta_msg = ServerMessage::Delta {
            pane_id: 1,
            from_gen: 5,
            gen: 6,
            cols: 1,
            rows: 1,
            cursor: WireCursor { x: 0, y: 0, visible: true, style: CursorShape::Block, blink: true },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 1, viewport_top: 0 },
            dirty_rows: vec![],
            row_ids: encode_row_ids(&[0x1]),
            styles: encode_style_table(&[]),
            selection: None,
            title: None,
        };
        let result = engine.ingest(&delta_msg).unwrap();
        assert!(matches!(result, IngestResult::Outbound(ClientMessage::Sync { .. })));
        assert_eq!(engine.pane(1).unwrap().generation, 3);
        assert_eq!(engine.pane(1).unwrap().resync_count, 2); // 1 from snapshot, 1 from the gap
    }

    #[test]
    fn non_pane_message_is_noop() {
        let mut engine = PaneSyncEngine::new();
        assert!(matches!(engine.ingest(&ServerMessage::Bell {}).unwrap(), IngestResult::Noop));
    }
}
