//! Outbound (client → server) message variants (§4.1, §6.1).
//!
//! Unlike inbound messages, these are sent as UTF-8 JSON text frames (the
//! legacy path retained for backwards compatibility per §4.1), so field
//! names use `camelCase` to match the wire shapes verbatim rather than
//! `rmp-serde`'s binary conventions.

use serde::{Deserialize, Serialize};

/// Key event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    /// Key pressed.
    Down,
    /// Key released.
    Up,
}

/// Mouse event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseState {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Pointer moved with no button-state change.
    Move,
}

/// Which clipboard register an operation addresses, as sent on the wire
/// (single-character form, distinct from [`super::inbound::ClipboardRegister`]'s
/// representation only in that this one round-trips through JSON as `'c'`/`'p'`
/// per §4.1's literal notation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardRegister {
    /// Clipboard.
    C,
    /// Primary selection.
    P,
}

/// A pending layout-tree edit, as produced by a divider drag (§4.5). Mirrors
/// [`super::inbound::WireLayoutNode`] but travels outbound as part of
/// `resize_layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutEditNode {
    /// A leaf occupied by (at most) one pane.
    #[serde(rename_all = "camelCase")]
    Pane {
        /// The occupying pane, if any.
        pane_id: Option<u32>,
        /// Width as a percentage of the parent.
        width_pct: f32,
        /// Height as a percentage of the parent.
        height_pct: f32,
    },
    /// A split container.
    #[serde(rename_all = "camelCase")]
    Container {
        /// Child nodes.
        children: Vec<LayoutEditNode>,
        /// Width as a percentage of the parent.
        width_pct: f32,
        /// Height as a percentage of the parent.
        height_pct: f32,
    },
}

/// All messages the client may send to the server (§4.1).
///
/// Master-only variants are documented per variant; [`crate::session::master`]
/// is responsible for gating them on the local `isMaster` mirror before a
/// [`crate::session::capabilities::Transport`] ever sees them - this enum
/// makes no gating decisions of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Sent once, immediately on connection open (§4.5).
    #[serde(rename_all = "camelCase")]
    Hello {
        /// This browser session's persisted client id.
        client_id: String,
        /// Foreground theme color hint, if the host supplies one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        theme_fg: Option<String>,
        /// Background theme color hint, if the host supplies one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        theme_bg: Option<String>,
    },

    /// A raw key event. Master-only.
    #[serde(rename_all = "camelCase")]
    Key {
        /// Target pane.
        pane_id: u32,
        /// The key's resolved character/name (`event.key`).
        key: String,
        /// The physical key code (`event.code`).
        code: String,
        /// The legacy numeric key code (`event.keyCode`).
        key_code: u32,
        /// Press or release.
        state: KeyState,
        /// Control modifier held.
        ctrl: bool,
        /// Alt modifier held.
        alt: bool,
        /// Shift modifier held.
        shift: bool,
        /// Meta/Cmd modifier held.
        meta: bool,
        /// Whether this is an OS key-repeat event.
        repeat: bool,
        /// Client-side event timestamp, milliseconds.
        timestamp: f64,
    },

    /// Composed/pasted text input. Master-only.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Target pane.
        pane_id: u32,
        /// The text payload.
        data: String,
        /// Client-side event timestamp, milliseconds.
        timestamp: f64,
    },

    /// A mouse event. Master-only.
    #[serde(rename_all = "camelCase")]
    Mouse {
        /// Target pane.
        pane_id: u32,
        /// Button bitmask/index: `0` left, `1` middle, `2` right, `3` none.
        button: u8,
        /// Cell column.
        x: u16,
        /// Cell row.
        y: u16,
        /// Event phase.
        state: MouseState,
        /// Control modifier held.
        ctrl: bool,
        /// Alt modifier held.
        alt: bool,
        /// Shift modifier held.
        shift: bool,
        /// Meta/Cmd modifier held.
        meta: bool,
        /// Client-side event timestamp, milliseconds.
        timestamp: f64,
    },

    /// A pane resize, emitted by the resize debounce. Master-only.
    #[serde(rename_all = "camelCase")]
    Resize {
        /// Target pane.
        pane_id: u32,
        /// New column count.
        cols: u16,
        /// New row count.
        rows: u16,
    },

    /// A scroll delta. Master-only.
    #[serde(rename_all = "camelCase")]
    Scroll {
        /// Target pane.
        pane_id: u32,
        /// Signed scroll delta, in lines.
        delta: i32,
    },

    /// A pane gained focus client-side.
    #[serde(rename_all = "camelCase")]
    Focus {
        /// Newly focused pane.
        pane_id: u32,
    },

    /// A resync request, issued by [`crate::pane::sync::sync_needed`].
    #[serde(rename_all = "camelCase")]
    Sync {
        /// Target pane.
        pane_id: u32,
        /// The generation this client believes it's at.
        gen: u32,
        /// The lowest rowId still cached, so the server can avoid resending
        /// rows the client already has.
        min_row_id: u64,
    },

    /// Request a new window. Master-only.
    #[serde(rename_all = "camelCase")]
    NewWindow {
        /// Layout template to seed the window with, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template_id: Option<String>,
    },

    /// Close a window. Master-only.
    #[serde(rename_all = "camelCase")]
    CloseWindow {
        /// Target window.
        window_id: u32,
    },

    /// Close a pane. Master-only.
    #[serde(rename_all = "camelCase")]
    ClosePane {
        /// Target pane.
        pane_id: u32,
    },

    /// Request mastership for this client.
    RequestMaster {},

    /// Keepalive.
    Ping {},

    /// Copy the current selection to clipboard. Master-only.
    #[serde(rename_all = "camelCase")]
    Copy {
        /// Target pane.
        pane_id: u32,
    },

    /// Select the entire pane buffer. Master-only.
    #[serde(rename_all = "camelCase")]
    SelectAll {
        /// Target pane.
        pane_id: u32,
    },

    /// Clear the current selection. Master-only.
    #[serde(rename_all = "camelCase")]
    ClearSelection {
        /// Target pane.
        pane_id: u32,
    },

    /// Request clipboard content to paste into a pane. Master-only.
    #[serde(rename_all = "camelCase")]
    ClipboardPaste {
        /// Target pane.
        pane_id: u32,
        /// Which register.
        clipboard: ClipboardRegister,
    },

    /// Push clipboard content from the host to the server (e.g. `OSC 52`
    /// round-trip). Master-only.
    #[serde(rename_all = "camelCase")]
    ClipboardSet {
        /// Which register.
        clipboard: ClipboardRegister,
        /// Payload.
        data: String,
    },

    /// Respond to an inbound `clipboard{operation: get}` request.
    #[serde(rename_all = "camelCase")]
    ClipboardResponse {
        /// Target pane.
        pane_id: u32,
        /// Which register.
        clipboard: ClipboardRegister,
        /// Payload.
        data: String,
    },

    /// Commit a divider-drag layout edit. Master-only.
    #[serde(rename_all = "camelCase")]
    ResizeLayout {
        /// Target window.
        window_id: u32,
        /// The edited tree, root-to-leaf.
        nodes: LayoutEditNode,
    },

    /// Swap two panes within a window. Master-only.
    #[serde(rename_all = "camelCase")]
    SwapPanes {
        /// Target window.
        window_id: u32,
        /// First pane.
        a: u32,
        /// Second pane.
        b: u32,
    },

    /// Apply a saved layout template to a window. Master-only.
    #[serde(rename_all = "camelCase")]
    SetWindowLayout {
        /// Target window.
        window_id: u32,
        /// Template to apply.
        template_id: String,
    },

    /// Paste an image by reference after host-side upload. Master-only.
    #[serde(rename_all = "camelCase")]
    ImagePaste {
        /// Target pane.
        pane_id: u32,
        /// Server-resolved path/reference to the uploaded image.
        path: String,
    },
}

impl ClientMessage {
    /// True for messages §4.5 gates on the local `isMaster` mirror. `hello`,
    /// `focus`, `sync`, `request_master`, and `ping` are always sendable.
    pub fn requires_master(&self) -> bool {
        !matches!(
            self,
            ClientMessage::Hello { .. }
                | ClientMessage::Focus { .. }
                | ClientMessage::Sync { .. }
                | ClientMessage::RequestMaster {}
                | ClientMessage::Ping {}
        )
    }

    /// Encode this message as the UTF-8 JSON text frame sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns an error only if `serde_json` itself fails, which does not
    /// happen for this enum's field types.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
