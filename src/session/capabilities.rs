//! Host capability traits (§4.5, §6.2): the seams a browser binding (or a
//! test harness) implements so the core never touches a WebSocket, a
//! timer, `sessionStorage`, or the clipboard directly.

use async_trait::async_trait;

use crate::error::CoreError;

/// Wall-clock access, abstracted so scenario tests can drive time
/// deterministically instead of sleeping in real time.
pub trait Clock: std::fmt::Debug {
    /// Milliseconds since an arbitrary but fixed epoch, monotonic for the
    /// lifetime of one `Clock` instance.
    fn now_ms(&self) -> f64;
}

/// The outbound half of the WebSocket connection. Framing/encoding
/// (compression flag, varint, JSON vs. msgpack) is the core's job; this
/// trait only has to move bytes.
#[async_trait(?Send)]
pub trait Transport: std::fmt::Debug {
    /// Send a text frame (outbound messages are JSON per §4.1).
    async fn send_text(&self, data: &str) -> Result<(), CoreError>;

    /// Whether the underlying connection currently believes itself open.
    fn is_open(&self) -> bool;
}

/// The `sessionStorage`-equivalent key/value surface (§6.2): `clientId`,
/// `dullahan.keybinds`, `debug`, and the settings bag all round-trip
/// through this.
pub trait SessionStorage: std::fmt::Debug {
    /// Read a stored value, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any prior one.
    fn set(&self, key: &str, value: &str);

    /// Remove a stored value.
    fn remove(&self, key: &str);
}

/// Clipboard read/write, which on the web platform is itself async and
/// permission-gated.
#[async_trait(?Send)]
pub trait ClipboardApi: std::fmt::Debug {
    /// Write `text` to the system clipboard.
    async fn write_text(&self, text: &str) -> Result<(), CoreError>;

    /// Read the system clipboard's current text content.
    async fn read_text(&self) -> Result<String, CoreError>;
}

/// Uploads a pasted image so the server can be given a durable reference
/// instead of inline bytes (§4.4's image-paste flow).
#[async_trait(?Send)]
pub trait ImageUploader: std::fmt::Debug {
    /// Upload `bytes` (of the given MIME type) and return the server-side
    /// path/reference to send in `image_paste`.
    async fn upload(&self, bytes: &[u8], mime_type: &str) -> Result<String, CoreError>;
}
