//! Session control layer (§4.5): connection lifecycle, master election,
//! layout tree, resize debounce, and the capability seams a host binds to
//! the DOM, WebSocket, and clipboard.

pub mod capabilities;
pub mod client_id;
pub mod connection;
pub mod layout;
pub mod master;
pub mod resize_debounce;
pub mod store;

pub use capabilities::{Clock, ClipboardApi, ImageUploader, SessionStorage, Transport};
pub use client_id::{load_or_create_client_id, CLIENT_ID_KEY};
pub use connection::{backoff_delay_ms, ConnectionManager, ConnectionState};
pub use layout::{build_resize_layout_nodes, drag_divider, resolve_focus_pane, LayoutNode, LayoutState, Window};
pub use master::MasterGate;
pub use resize_debounce::{ResizeDebouncer, DEBOUNCE_MS};
pub use store::{SessionEvent, SessionStore};
