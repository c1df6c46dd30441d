//! Master election (§4.5): mirrors the server's authoritative master-id
//! locally and gates outbound master-only messages on it.
//!
//! A thin routing layer that asks a shared handle for authorization
//! rather than embedding the policy inline at every call site: the client
//! gates its own outbound sends on a locally-mirrored `is_master` flag
//! rather than waiting on a server round-trip per message.

use crate::error::CoreError;
use crate::wire::outbound::ClientMessage;

/// Tracks this client's own id and the server's last-announced master id.
#[derive(Debug)]
pub struct MasterGate {
    client_id: String,
    master_id: Option<String>,
}

impl MasterGate {
    /// A gate for `client_id`, with no master currently known.
    pub fn new(client_id: String) -> Self {
        MasterGate { client_id, master_id: None }
    }

    /// Apply a `master_changed{masterId}` update (§4.5).
    pub fn on_master_changed(&mut self, master_id: Option<String>) {
        self.master_id = master_id;
    }

    /// The server's currently announced master id, if any.
    pub fn master_id(&self) -> Option<&str> {
        self.master_id.as_deref()
    }

    /// Whether this client currently holds mastership.
    pub fn is_master(&self) -> bool {
        self.master_id.as_deref() == Some(self.client_id.as_str())
    }

    /// Gate `msg` on mastership (§4.5). Master-only messages are silently
    /// dropped when this client isn't master; always-sendable messages
    /// (`hello`, `focus`, `sync`, `request_master`, `ping`) pass through
    /// unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MasterGated`] if `msg` requires mastership and
    /// this client doesn't currently hold it.
    pub fn gate(&self, msg: ClientMessage) -> Result<ClientMessage, CoreError> {
        if msg.requires_master() && !self.is_master() {
            Err(CoreError::MasterGated)
        } else {
            Ok(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_only_message_is_gated_when_not_master() {
        let gate = MasterGate::new("self".to_string());
        let result = gate.gate(ClientMessage::Copy { pane_id: 1 });
        assert_eq!(result, Err(CoreError::MasterGated));
    }

    #[test]
    fn master_only_message_passes_once_self_is_master() {
        let mut gate = MasterGate::new("self".to_string());
        gate.on_master_changed(Some("self".to_string()));
        assert!(gate.is_master());
        assert!(gate.gate(ClientMessage::Copy { pane_id: 1 }).is_ok());
    }

    #[test]
    fn always_sendable_messages_bypass_gating() {
        let gate = MasterGate::new("self".to_string());
        assert!(gate.gate(ClientMessage::Ping {}).is_ok());
        assert!(gate.gate(ClientMessage::RequestMaster {}).is_ok());
    }

    #[test]
    fn master_changed_to_other_revokes_mastership() {
        let mut gate = MasterGate::new("self".to_string());
        gate.on_master_changed(Some("self".to_string()));
        gate.on_master_changed(Some("other".to_string()));
        assert!(!gate.is_master());
        assert_eq!(gate.gate(ClientMessage::Copy { pane_id: 1 }), Err(CoreError::MasterGated));
    }
}
