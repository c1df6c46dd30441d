//! `SessionStore` (§6.3): wires the wire codec, pane sync engine, master
//! election, resize debounce, and layout cache into the single object a
//! host binding drives. Command methods are synchronous: they gate and
//! build a [`ClientMessage`] and return it for the host to encode and
//! hand to its own (necessarily async) [`crate::session::capabilities::Transport`],
//! keeping this store itself free of any transport dependency, matching
//! §5's single-threaded cooperative scheduling model - no internal task
//! spawns, no locks.

use tokio::sync::broadcast;

use crate::error::CoreError;
use crate::input::mouse::MouseEmit;
use crate::pane::engine::{IngestResult, PaneSyncEngine};
use crate::pane::state::PaneState;
use crate::pane::sync::TerminalSnapshot;
use crate::session::connection::ConnectionManager;
use crate::session::layout::{build_resize_layout_nodes, LayoutNode, LayoutState};
use crate::session::master::MasterGate;
use crate::session::resize_debounce::ResizeDebouncer;
use crate::wire::inbound::{
    ClipboardOperation, ClipboardRegister as InClipboardRegister, ServerMessage, ShellIntegrationEvent,
};
use crate::wire::outbound::{ClientMessage, ClipboardRegister, KeyState};

/// Capacity of the broadcast channel backing [`SessionStore::subscribe`].
/// Events this crate emits are low-frequency UI-facing notifications (not
/// the 60fps render path, which bypasses this entirely), so a modest
/// buffer is plenty; a lagging subscriber sees
/// [`broadcast::error::RecvError::Lagged`] rather than blocking the store.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A server-pushed notification surfaced to host subscribers (§6.3's
/// `subscribe(event, cb)` surface, collapsed into one channel + enum since
/// Rust has no ambient event-name dispatch).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A pane's viewport changed; render-ready.
    PaneUpdated(TerminalSnapshot),
    /// A pane's title changed.
    Title {
        /// Target pane.
        pane_id: u32,
        /// New title.
        title: String,
    },
    /// Terminal bell.
    Bell,
    /// A toast notification request.
    Toast {
        /// Originating pane, if any.
        pane_id: Option<u32>,
        /// Optional title.
        title: Option<String>,
        /// Body text.
        message: String,
    },
    /// Progress reporting.
    Progress {
        /// Target pane.
        pane_id: u32,
        /// Progress state, `0..=4`.
        state: u8,
        /// Progress value, `0..=100`.
        value: u8,
    },
    /// Shell integration lifecycle event.
    ShellIntegration {
        /// Target pane.
        pane_id: u32,
        /// Which lifecycle event fired.
        event: ShellIntegrationEvent,
        /// Exit code, present only on `command_end`.
        exit_code: Option<i32>,
    },
    /// A pane gained focus server-side.
    Focus {
        /// Newly focused pane.
        pane_id: u32,
    },
    /// Master election changed.
    MasterChanged {
        /// The new master's client id, or `None`.
        master_id: Option<String>,
    },
    /// The window/pane layout changed.
    Layout(LayoutState),
    /// Server pushed clipboard content.
    ClipboardSet {
        /// Target pane.
        pane_id: u32,
        /// Which register.
        clipboard: InClipboardRegister,
        /// Payload, if present.
        data: Option<String>,
    },
    /// Server requested clipboard content.
    ClipboardGet {
        /// Target pane.
        pane_id: u32,
        /// Which register.
        clipboard: InClipboardRegister,
    },
    /// Raw side-channel output.
    Output(Vec<u8>),
}

/// Owns session-wide state and exposes the §6.3 client API. Built once per
/// connection lifetime by the host; the host drives `handle_inbound` for
/// every decoded [`ServerMessage`] and calls the command methods in
/// response to user input.
#[derive(Debug)]
pub struct SessionStore {
    client_id: String,
    connection: ConnectionManager,
    master: MasterGate,
    resize: ResizeDebouncer,
    layout: LayoutState,
    panes: PaneSyncEngine,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// A store for `client_id`, with no connection, panes, or layout yet.
    pub fn new(client_id: String) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        SessionStore {
            master: MasterGate::new(client_id.clone()),
            client_id,
            connection: ConnectionManager::new(),
            resize: ResizeDebouncer::new(),
            layout: LayoutState::default(),
            panes: PaneSyncEngine::new(),
            events,
        }
    }

    /// This client's persisted id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Whether the connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Whether this client currently holds mastership.
    pub fn is_master(&self) -> bool {
        self.master.is_master()
    }

    /// The server's currently announced master id, if any.
    pub fn master_id(&self) -> Option<&str> {
        self.master.master_id()
    }

    /// A pane's current state, if known.
    pub fn pane(&self, pane_id: u32) -> Option<&PaneState> {
        self.panes.pane(pane_id)
    }

    /// The cached layout state.
    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    /// Subscribe to session events (§6.3).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is the common case in a unit test; a send error
        // just means nobody's listening right now.
        let _ = self.events.send(event);
    }

    /// A reconnect attempt is beginning; the host is about to open a new
    /// transport.
    pub fn begin_connect(&mut self) {
        self.connection.on_connecting();
    }

    /// The transport opened (§4.5): resets backoff and returns the `hello`
    /// plus any immediately-flushed pending resizes, for the host to send.
    pub fn on_transport_open(&mut self) -> Vec<ClientMessage> {
        self.connection.on_open();
        let mut messages = vec![ClientMessage::Hello { client_id: self.client_id.clone(), theme_fg: None, theme_bg: None }];
        messages.extend(self.flush_pending_resizes());
        messages
    }

    /// The transport closed; returns the backoff delay (ms) before the
    /// host should attempt to reconnect (§4.5).
    pub fn on_transport_close(&mut self) -> u64 {
        self.connection.on_close()
    }

    /// Dispatch a decoded inbound message (§4.1, §4.2, §4.5). Snapshot and
    /// delta messages flow through the pane sync engine; everything else
    /// updates local state and/or emits a [`SessionEvent`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DecodeError`] if a snapshot/delta's packed
    /// buffers are malformed (§7); per policy, this is not fatal and the
    /// pane recovers on the next message.
    pub fn handle_inbound(&mut self, msg: ServerMessage) -> Result<Option<ClientMessage>, CoreError> {
        match &msg {
            ServerMessage::Snapshot { .. } | ServerMessage::Delta { .. } => match self.panes.ingest(&msg)? {
                IngestResult::Updated(snapshot) => {
                    self.emit(SessionEvent::PaneUpdated(snapshot));
                    Ok(None)
                }
                IngestResult::Outbound(sync_msg) => Ok(Some(sync_msg)),
                IngestResult::Noop => Ok(None),
            },
            ServerMessage::Title { pane_id, title } => {
                self.emit(SessionEvent::Title { pane_id: *pane_id, title: title.clone() });
                Ok(None)
            }
            ServerMessage::Bell {} => {
                self.emit(SessionEvent::Bell);
                Ok(None)
            }
            ServerMessage::Toast { pane_id, title, message } => {
                self.emit(SessionEvent::Toast { pane_id: *pane_id, title: title.clone(), message: message.clone() });
                Ok(None)
            }
            ServerMessage::Progress { pane_id, state, value } => {
                self.emit(SessionEvent::Progress { pane_id: *pane_id, state: *state, value: *value });
                Ok(None)
            }
            ServerMessage::ShellIntegration { pane_id, event, exit_code } => {
                self.emit(SessionEvent::ShellIntegration { pane_id: *pane_id, event: *event, exit_code: *exit_code });
                Ok(None)
            }
            ServerMessage::Focus { pane_id } => {
                self.emit(SessionEvent::Focus { pane_id: *pane_id });
                Ok(None)
            }
            ServerMessage::MasterChanged { master_id } => {
                self.master.on_master_changed(master_id.clone());
                log::info!("master changed: {master_id:?}");
                self.emit(SessionEvent::MasterChanged { master_id: master_id.clone() });
                Ok(None)
            }
            ServerMessage::Layout { .. } => {
                if let Some(state) = LayoutState::apply(&msg) {
                    self.layout = state.clone();
                    self.emit(SessionEvent::Layout(state));
                }
                Ok(None)
            }
            ServerMessage::Clipboard { operation, pane_id, clipboard, data } => {
                match operation {
                    ClipboardOperation::Set => {
                        self.emit(SessionEvent::ClipboardSet { pane_id: *pane_id, clipboard: *clipboard, data: data.clone() });
                    }
                    ClipboardOperation::Get => {
                        self.emit(SessionEvent::ClipboardGet { pane_id: *pane_id, clipboard: *clipboard });
                    }
                }
                Ok(None)
            }
            ServerMessage::Output { data } => {
                self.emit(SessionEvent::Output(data.clone()));
                Ok(None)
            }
            ServerMessage::Hello {} | ServerMessage::Pong {} => Ok(None),
        }
    }

    fn gate(&self, msg: ClientMessage) -> Result<ClientMessage, CoreError> {
        self.master.gate(msg)
    }

    /// Send a raw key event. Master-gated.
    pub fn send_key(
        &self,
        pane_id: u32,
        key: String,
        code: String,
        key_code: u32,
        state: KeyState,
        modifiers: crate::input::keybind::Modifiers,
        repeat: bool,
        timestamp: f64,
    ) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Key {
            pane_id,
            key,
            code,
            key_code,
            state,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            shift: modifiers.shift,
            meta: modifiers.meta,
            repeat,
            timestamp,
        })
    }

    /// Send composed/pasted text. Master-gated.
    pub fn send_text(&self, pane_id: u32, data: String, timestamp: f64) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Text { pane_id, data, timestamp })
    }

    /// Send a mouse event. Master-gated.
    pub fn send_mouse(
        &self,
        pane_id: u32,
        emit: MouseEmit,
        modifiers: crate::input::keybind::Modifiers,
        timestamp: f64,
    ) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Mouse {
            pane_id,
            button: emit.button,
            x: emit.x,
            y: emit.y,
            state: emit.state,
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            shift: modifiers.shift,
            meta: modifiers.meta,
            timestamp,
        })
    }

    /// Send a scroll delta. Master-gated.
    pub fn send_scroll(&self, pane_id: u32, delta: i32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Scroll { pane_id, delta })
    }

    /// A pane gained focus client-side. Always sendable.
    pub fn send_focus(&self, pane_id: u32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Focus { pane_id })
    }

    /// Record a desired pane size, coalesced by the resize debounce
    /// (§4.5). Returns the debounce deadline (ms) the host should arm a
    /// timer for, if a new one was started.
    pub fn set_pane_size(&mut self, pane_id: u32, cols: u16, rows: u16, now_ms: f64) -> Option<f64> {
        self.resize.set_pane_size(pane_id, cols, rows, now_ms)
    }

    /// Flush pending resizes, as the debounce timer firing should (§4.5,
    /// invariant 10). Only emits wire messages while connected and master;
    /// otherwise the pending sizes stay queued for the next opportunity.
    pub fn flush_pending_resizes(&mut self) -> Vec<ClientMessage> {
        if !self.connection.is_connected() || !self.master.is_master() {
            return Vec::new();
        }
        self.resize
            .flush()
            .into_iter()
            .map(|(pane_id, cols, rows)| ClientMessage::Resize { pane_id, cols, rows })
            .collect()
    }

    /// Request a new window. Master-gated.
    pub fn create_window(&self, template_id: Option<String>) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::NewWindow { template_id })
    }

    /// Close a window. Master-gated.
    pub fn close_window(&self, window_id: u32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::CloseWindow { window_id })
    }

    /// Close a pane. Master-gated. Also drops the pane's local sync state.
    pub fn close_pane(&mut self, pane_id: u32) -> Result<ClientMessage, CoreError> {
        let msg = self.gate(ClientMessage::ClosePane { pane_id })?;
        self.panes.remove_pane(pane_id);
        Ok(msg)
    }

    /// Request mastership. Always sendable.
    pub fn request_master(&self) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::RequestMaster {})
    }

    /// Copy the current selection. Master-gated.
    pub fn send_copy(&self, pane_id: u32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Copy { pane_id })
    }

    /// Select the entire pane buffer. Master-gated.
    pub fn select_all(&self, pane_id: u32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::SelectAll { pane_id })
    }

    /// Clear the current selection. Master-gated.
    pub fn clear_selection(&self, pane_id: u32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::ClearSelection { pane_id })
    }

    /// Request clipboard content to paste into a pane. Master-gated.
    pub fn send_clipboard_paste(&self, pane_id: u32, clipboard: ClipboardRegister) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::ClipboardPaste { pane_id, clipboard })
    }

    /// Push clipboard content to the server. Master-gated.
    pub fn send_clipboard_set(&self, clipboard: ClipboardRegister, data: String) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::ClipboardSet { clipboard, data })
    }

    /// Issue a resync request. Always sendable.
    pub fn send_sync(&self, pane_id: u32, gen: u32, min_row_id: u64) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::Sync { pane_id, gen, min_row_id })
    }

    /// Respond to an inbound `clipboard{operation: get}` request. Always
    /// sendable (it's a response, not a user-initiated mutation).
    pub fn send_clipboard_response(
        &self,
        pane_id: u32,
        clipboard: ClipboardRegister,
        data: String,
    ) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::ClipboardResponse { pane_id, clipboard, data })
    }

    /// Commit a divider-drag layout edit. Master-gated.
    pub fn send_resize_layout(&self, window_id: u32, layout: &LayoutNode) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::ResizeLayout { window_id, nodes: build_resize_layout_nodes(layout) })
    }

    /// Swap two panes within a window. Master-gated.
    pub fn send_swap_panes(&self, window_id: u32, a: u32, b: u32) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::SwapPanes { window_id, a, b })
    }

    /// Apply a saved layout template to a window. Master-gated.
    pub fn send_set_window_layout(&self, window_id: u32, template_id: String) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::SetWindowLayout { window_id, template_id })
    }

    /// Paste an image by reference, after the host has uploaded it through
    /// its [`crate::session::capabilities::ImageUploader`] and obtained
    /// `path`. Master-gated.
    pub fn send_image_paste(&self, pane_id: u32, path: String) -> Result<ClientMessage, CoreError> {
        self.gate(ClientMessage::ImagePaste { pane_id, path })
    }
}
