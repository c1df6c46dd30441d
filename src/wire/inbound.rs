//! Inbound (server → client) message variants (§4.1).
//!
//! These decode from the msgpack document produced by [`super::frame`].
//! Byte-buffer fields (`cells`, `styles`, `rowIds`, `graphemes`,
//! `hyperlinks`) stay as raw `Vec<u8>` here - [`crate::pane`] is the layer
//! that knows how to unpack them into [`crate::wire::cell::PackedCell`] and
//! friends. Keeping the wire DTOs dumb means a msgpack decode failure stays
//! localized to `serde`/`rmp-serde`, not entangled with cell-layout parsing.

use serde::{Deserialize, Serialize};

/// Cursor rendering shape (§3, §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorShape {
    /// Filled block.
    Block,
    /// Underline.
    Underline,
    /// Vertical bar.
    Bar,
}

/// Cursor state as carried in a snapshot or delta (§3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCursor {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Whether the cursor is currently visible.
    pub visible: bool,
    /// Rendering shape.
    pub style: CursorShape,
    /// Whether the cursor blinks.
    pub blink: bool,
}

/// Scrollback position (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScrollback {
    /// Total number of rows, including history.
    pub total_rows: u32,
    /// Topmost visible row, measured from the top of history.
    pub viewport_top: u32,
}

/// Selection bounds (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSelection {
    /// Start column.
    pub start_x: i32,
    /// Start row.
    pub start_y: i32,
    /// End column.
    pub end_x: i32,
    /// End row.
    pub end_y: i32,
    /// Whether the selection is a rectangular (block) selection rather than
    /// a linear one.
    pub is_rectangle: bool,
}

/// One dirty row carried by a [`ServerMessage::Delta`] (§4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyRow {
    /// Stable row identity.
    pub id: u64,
    /// Packed cell buffer for this row (`cols * 8` bytes).
    #[serde(with = "serde_bytes")]
    pub cells: Vec<u8>,
    /// Row-relative grapheme side table, if any cell anchors a cluster.
    #[serde(default, with = "serde_bytes_option")]
    pub graphemes: Option<Vec<u8>>,
    /// Row-relative hyperlink side table, if any cell carries a link.
    #[serde(default, with = "serde_bytes_option")]
    pub hyperlinks: Option<Vec<u8>>,
}

/// `serde_bytes` only ships a helper for non-`Option` fields; this module
/// adapts it to `Option<Vec<u8>>` so absent side tables decode as `None`
/// instead of requiring callers to wrap every access.
mod serde_bytes_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serde_bytes::Bytes::new(bytes).serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let buf: Option<serde_bytes::ByteBuf> = Option::deserialize(d)?;
        Ok(buf.map(serde_bytes::ByteBuf::into_vec))
    }
}

/// Shell-integration lifecycle event (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellIntegrationEvent {
    /// Shell prompt is about to be drawn.
    PromptStart,
    /// Shell prompt finished drawing; command entry begins.
    PromptEnd,
    /// Command output has started.
    OutputStart,
    /// Command finished; `exit_code` (if present) is its status.
    CommandEnd,
}

/// Clipboard operation direction (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardOperation {
    /// Server is pushing clipboard content to the client.
    Set,
    /// Server is requesting clipboard content from the client.
    Get,
}

/// Which clipboard register an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardRegister {
    /// Clipboard ("c"lipboard).
    C,
    /// Primary selection ("p"rimary).
    P,
}

/// A layout tree node as carried on the wire. Mirrors
/// [`crate::session::layout::LayoutNode`] but stays a plain DTO so a
/// malformed tree fails to decode at the `serde` boundary rather than deep
/// inside layout logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireLayoutNode {
    /// A leaf occupied by (at most) one pane.
    #[serde(rename_all = "camelCase")]
    Pane {
        /// The occupying pane, if any (an empty split slot has none).
        pane_id: Option<u32>,
        /// Width as a percentage of the parent.
        width_pct: f32,
        /// Height as a percentage of the parent.
        height_pct: f32,
    },
    /// A split container.
    #[serde(rename_all = "camelCase")]
    Container {
        /// Child nodes; direction alternates by depth (§3).
        children: Vec<WireLayoutNode>,
        /// Width as a percentage of the parent.
        width_pct: f32,
        /// Height as a percentage of the parent.
        height_pct: f32,
    },
}

/// One window in a `layout` message (§4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWindow {
    /// Window identifier.
    pub id: u32,
    /// Currently focused pane within this window.
    pub active_pane_id: Option<u32>,
    /// All panes owned by this window, in creation order.
    pub panes: Vec<u32>,
    /// The split tree, if one has been established.
    pub layout: Option<WireLayoutNode>,
}

/// A saved layout template, referenced by id when creating new windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    /// Template identifier.
    pub id: String,
    /// Human-readable template name.
    pub name: String,
}

/// All messages the server may send to the client (§4.1).
///
/// Discriminated by a string `type` field, matching the wire format
/// exactly; `#[serde(other)]` is deliberately not used; an unrecognized
/// `type` is a [`crate::error::CoreError::DecodeError`], not silently
/// ignored, so new server message kinds are visible in logs rather than
/// invisible no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Unused inbound; present only because the wire format is symmetric
    /// with an outbound `hello`.
    Hello {},

    /// A full per-pane state snapshot (§3, §4.2).
    #[serde(rename_all = "camelCase")]
    Snapshot {
        /// Target pane.
        pane_id: u32,
        /// Generation this snapshot establishes.
        gen: u32,
        /// Column count.
        cols: u16,
        /// Row count.
        rows: u16,
        /// Cursor state.
        cursor: WireCursor,
        /// Whether the alternate screen is active.
        alt_screen: bool,
        /// Scrollback position.
        scrollback: WireScrollback,
        /// Packed cell buffer, `rows * cols * 8` bytes.
        #[serde(with = "serde_bytes")]
        cells: Vec<u8>,
        /// Style table buffer.
        #[serde(with = "serde_bytes")]
        styles: Vec<u8>,
        /// Per-viewport-row stable identities, `rows` entries.
        #[serde(with = "serde_bytes")]
        row_ids: Vec<u8>,
        /// Global-cell-index-keyed grapheme side table, msgpack-encoded.
        #[serde(default, with = "serde_bytes_option")]
        graphemes: Option<Vec<u8>>,
        /// Global-cell-index-keyed hyperlink side table, msgpack-encoded.
        #[serde(default, with = "serde_bytes_option")]
        hyperlinks: Option<Vec<u8>>,
        /// Current selection, if any.
        #[serde(default)]
        selection: Option<WireSelection>,
        /// Pane title, if known.
        #[serde(default)]
        title: Option<String>,
    },

    /// A delta against a prior generation (§3, §4.2).
    #[serde(rename_all = "camelCase")]
    Delta {
        /// Target pane.
        pane_id: u32,
        /// The generation this delta is computed from.
        from_gen: u32,
        /// The generation this delta establishes.
        gen: u32,
        /// Column count.
        cols: u16,
        /// Row count.
        rows: u16,
        /// Cursor state.
        cursor: WireCursor,
        /// Whether the alternate screen is active.
        alt_screen: bool,
        /// Scrollback position (`vp` on the wire).
        #[serde(rename = "vp")]
        scrollback: WireScrollback,
        /// Rows whose contents changed since `from_gen`.
        dirty_rows: Vec<DirtyRow>,
        /// Per-viewport-row stable identities for the new viewport.
        #[serde(with = "serde_bytes")]
        row_ids: Vec<u8>,
        /// Style-table entries that changed or were newly introduced.
        #[serde(with = "serde_bytes")]
        styles: Vec<u8>,
        /// Current selection, if any.
        #[serde(default)]
        selection: Option<WireSelection>,
        /// Pane title, if it changed.
        #[serde(default)]
        title: Option<String>,
    },

    /// Pane title changed.
    #[serde(rename_all = "camelCase")]
    Title {
        /// Target pane.
        pane_id: u32,
        /// New title.
        title: String,
    },

    /// Terminal bell.
    Bell {},

    /// A toast notification request.
    #[serde(rename_all = "camelCase")]
    Toast {
        /// Originating pane, if any.
        #[serde(default)]
        pane_id: Option<u32>,
        /// Optional title.
        #[serde(default)]
        title: Option<String>,
        /// Body text.
        message: String,
    },

    /// Progress reporting (e.g. OSC 9;4).
    #[serde(rename_all = "camelCase")]
    Progress {
        /// Target pane.
        pane_id: u32,
        /// Progress state, `0..=4`.
        state: u8,
        /// Progress value, `0..=100`.
        value: u8,
    },

    /// Shell integration lifecycle event.
    #[serde(rename_all = "camelCase")]
    ShellIntegration {
        /// Target pane.
        pane_id: u32,
        /// Which lifecycle event fired.
        event: ShellIntegrationEvent,
        /// Exit code, present only on `command_end`.
        #[serde(default)]
        exit_code: Option<i32>,
    },

    /// A pane gained focus server-side.
    #[serde(rename_all = "camelCase")]
    Focus {
        /// The newly focused pane.
        pane_id: u32,
    },

    /// Master election changed.
    #[serde(rename_all = "camelCase")]
    MasterChanged {
        /// The new master's client id, or `None` if no client currently
        /// holds mastership.
        master_id: Option<String>,
    },

    /// The window/pane layout changed.
    #[serde(rename_all = "camelCase")]
    Layout {
        /// Currently active window.
        active_window_id: u32,
        /// All windows.
        windows: Vec<WireWindow>,
        /// Saved layout templates.
        templates: Vec<LayoutTemplate>,
    },

    /// Keepalive response to an outbound `ping`.
    Pong {},

    /// Raw PTY-adjacent output, outside the snapshot/delta model (e.g. for
    /// diagnostics or a side channel).
    Output {
        /// Opaque output payload.
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    },

    /// Clipboard set/get protocol message.
    #[serde(rename_all = "camelCase")]
    Clipboard {
        /// Direction of the operation.
        operation: ClipboardOperation,
        /// Target pane.
        pane_id: u32,
        /// Which register.
        clipboard: ClipboardRegister,
        /// Payload, present when `operation == Set`.
        #[serde(default)]
        data: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgpack_roundtrip(msg: &ServerMessage) -> ServerMessage {
        let bytes = rmp_serde::to_vec_named(msg).expect("encode");
        rmp_serde::from_slice(&bytes).expect("decode")
    }

    #[test]
    fn bell_roundtrips() {
        let msg = ServerMessage::Bell {};
        assert_eq!(msgpack_roundtrip(&msg), msg);
    }

    #[test]
    fn snapshot_roundtrips_with_optional_side_tables() {
        let msg = ServerMessage::Snapshot {
            pane_id: 1,
            gen: 10,
            cols: 3,
            rows: 1,
            cursor: WireCursor { x: 0, y: 0, visible: true, style: CursorShape::Block, blink: true },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 1, viewport_top: 0 },
            cells: vec![0u8; 3 * 8],
            styles: vec![0, 0],
            row_ids: vec![0x42, 0, 0, 0, 0, 0, 0, 0],
            graphemes: None,
            hyperlinks: None,
            selection: None,
            title: Some("pane 1".into()),
        };
        assert_eq!(msgpack_roundtrip(&msg), msg);
    }

    #[test]
    fn delta_roundtrips_with_dirty_rows() {
        let msg = ServerMessage::Delta {
            pane_id: 1,
            from_gen: 10,
            gen: 11,
            cols: 3,
            rows: 1,
            cursor: WireCursor { x: 1, y: 0, visible: true, style: CursorShape::Bar, blink: false },
            alt_screen: false,
            scrollback: WireScrollback { total_rows: 1, viewport_top: 0 },
            dirty_rows: vec![DirtyRow {
                id: 0x42,
                cells: vec![1u8; 3 * 8],
                graphemes: Some(vec![1, 2, 3]),
                hyperlinks: None,
            }],
            row_ids: vec![0x42, 0, 0, 0, 0, 0, 0, 0],
            styles: vec![0, 0],
            selection: None,
            title: None,
        };
        assert_eq!(msgpack_roundtrip(&msg), msg);
    }

    #[test]
    fn unknown_type_fails_to_decode() {
        let map: std::collections::BTreeMap<&str, &str> =
            [("type", "not_a_real_variant")].into_iter().collect();
        let bytes = rmp_serde::to_vec_named(&map).unwrap();
        let decoded: Result<ServerMessage, _> = rmp_serde::from_slice(&bytes);
        assert!(decoded.is_err());
    }

    #[test]
    fn layout_tree_roundtrips() {
        let msg = ServerMessage::Layout {
            active_window_id: 1,
            windows: vec![WireWindow {
                id: 1,
                active_pane_id: Some(5),
                panes: vec![5, 6],
                layout: Some(WireLayoutNode::Container {
                    children: vec![
                        WireLayoutNode::Pane { pane_id: Some(5), width_pct: 50.0, height_pct: 100.0 },
                        WireLayoutNode::Pane { pane_id: Some(6), width_pct: 50.0, height_pct: 100.0 },
                    ],
                    width_pct: 100.0,
                    height_pct: 100.0,
                }),
            }],
            templates: vec![],
        };
        assert_eq!(msgpack_roundtrip(&msg), msg);
    }
}
