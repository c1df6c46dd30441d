//! Wire codec, per-pane delta sync, render pipeline, and input core for
//! the Dullahan multi-pane terminal client.
//!
//! This crate is a library with no I/O of its own (§1's Non-goals): a
//! host (a wasm-bindgen browser binding, or a test harness) owns the
//! WebSocket, the DOM, timers, and the clipboard, and drives this crate
//! through the capability traits in [`session::capabilities`].

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod pane;
pub mod render;
pub mod session;
pub mod wire;

pub use error::CoreError;
pub use input::{
    Action, ImeHandler, KeyDownOutcome, KeyEvent, KeyUpOutcome, Keybind, KeyboardHandler, Modifiers,
    MouseButtons, MouseEmit, MouseHandler, PaneFocusDirection, PerformableContext, ScrollAmount,
    ScrollDirection, WindowCycleDirection,
};
pub use pane::{IngestResult, PaneState, PaneSyncEngine, TerminalSnapshot};
pub use render::{CellMetrics, CellMetricsSource, RenderPipeline, RenderedPane, Segment};
pub use session::{
    ConnectionManager, ConnectionState, LayoutNode, LayoutState, MasterGate, ResizeDebouncer, SessionEvent,
    SessionStore, Window,
};
pub use wire::codec::{decode_server_message, encode_client_message};
pub use wire::inbound::ServerMessage;
pub use wire::outbound::ClientMessage;
