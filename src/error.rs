//! Error kinds for the Dullahan client core.
//!
//! Per the error-handling design, no error variant here is fatal to the
//! core: every call site that can produce one logs it and continues rather
//! than propagating out of the event handler that produced it. `CoreError`
//! exists so callers (and tests) can match on *kind* instead of string
//! content.

use thiserror::Error;

/// A decoded, classified failure produced by the wire codec, the per-pane
/// sync engine, or the session layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A frame, msgpack document, or packed cell/style/rowId buffer was
    /// malformed. The offending message is dropped; a subsequent delta or
    /// snapshot recovers the pane.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A delta arrived with `fromGen < generation` and was not also behind
    /// the server's advertised target generation. Dropped silently.
    #[error("stale delta: fromGen {from_gen} < generation {generation}")]
    ProtocolStaleDelta {
        /// The delta's `fromGen`.
        from_gen: u32,
        /// The pane's current generation.
        generation: u32,
    },

    /// A delta arrived with `fromGen > generation`. Not applied; a `sync`
    /// request is issued instead.
    #[error("generation gap: fromGen {from_gen} > generation {generation}")]
    ProtocolGap {
        /// The delta's `fromGen`.
        from_gen: u32,
        /// The pane's current generation.
        generation: u32,
    },

    /// The transport reported the connection is down.
    #[error("connection lost")]
    ConnectionLost,

    /// A master-only operation was attempted while this client is not
    /// master. The operation is silently ignored; this variant exists for
    /// observability (logging/testing), not for surfacing to the user.
    #[error("operation gated: client is not master")]
    MasterGated,

    /// The host's clipboard API denied permission. Reported via the
    /// toast/alert channel; not retried automatically.
    #[error("clipboard permission denied: {0}")]
    ClipboardPermission(String),

    /// An image-paste upload failed. User-visible alert with the HTTP
    /// status or error text; the pane is otherwise unaffected.
    #[error("image paste upload failed: {0}")]
    ImagePasteUploadFail(String),

    /// A keybind configuration entry failed to parse. The offending entry
    /// is skipped; other entries continue to load.
    #[error("keybind parse error in {entry:?}: {reason}")]
    KeybindParseError {
        /// The offending configuration string.
        entry: String,
        /// Human-readable reason the parse failed.
        reason: String,
    },
}

impl CoreError {
    /// Short, stable tag for the error kind, suitable for log fields or
    /// test assertions that don't want to match on full message text.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::DecodeError(_) => "DECODE_ERROR",
            CoreError::ProtocolStaleDelta { .. } => "PROTOCOL_STALE_DELTA",
            CoreError::ProtocolGap { .. } => "PROTOCOL_GAP",
            CoreError::ConnectionLost => "CONNECTION_LOST",
            CoreError::MasterGated => "MASTER_GATED",
            CoreError::ClipboardPermission(_) => "CLIPBOARD_PERMISSION",
            CoreError::ImagePasteUploadFail(_) => "IMAGE_PASTE_UPLOAD_FAIL",
            CoreError::KeybindParseError { .. } => "KEYBIND_PARSE_ERROR",
        }
    }
}
