//! Top-level wire codec (§4.1, §6.1): ties frame decoding and msgpack/JSON
//! (de)serialization into a single entry point so callers never touch
//! `rmp_serde`/`serde_json` directly.

use crate::error::CoreError;
use crate::wire::frame::decode_frame;
use crate::wire::inbound::ServerMessage;
use crate::wire::outbound::ClientMessage;

/// Decode one inbound binary WebSocket frame into a [`ServerMessage`].
///
/// # Errors
///
/// Returns [`CoreError::DecodeError`] if the frame fails to unframe
/// (bad compression flag, truncated varint, failed Snappy decompression)
/// or if the resulting bytes don't decode as a recognized msgpack
/// [`ServerMessage`] variant.
pub fn decode_server_message(frame: &[u8]) -> Result<ServerMessage, CoreError> {
    let payload = decode_frame(frame)?;
    rmp_serde::from_slice(&payload)
        .map_err(|e| CoreError::DecodeError(format!("msgpack decode failed: {e}")))
}

/// Encode an outbound [`ClientMessage`] as the UTF-8 JSON text it's sent as
/// (§4.1: "Outbound client messages are sent as UTF-8 JSON text").
///
/// # Errors
///
/// Returns [`CoreError::DecodeError`] only if `serde_json` itself fails,
/// which does not happen for this enum's field types; the error type is
/// reused here rather than adding an `EncodeError` variant nothing else
/// produces.
pub fn encode_client_message(msg: &ClientMessage) -> Result<String, CoreError> {
    msg.to_json().map_err(|e| CoreError::DecodeError(format!("json encode failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::frame::encode_raw_frame;
    use crate::wire::outbound::KeyState;

    #[test]
    fn decodes_bell_through_raw_frame() {
        let payload = rmp_serde::to_vec_named(&ServerMessage::Bell {}).unwrap();
        let frame = encode_raw_frame(&payload);
        assert_eq!(decode_server_message(&frame).unwrap(), ServerMessage::Bell {});
    }

    #[test]
    fn rejects_malformed_frame() {
        assert!(decode_server_message(&[9, 1, 2]).is_err());
    }

    #[test]
    fn encodes_key_message_as_json() {
        let msg = ClientMessage::Key {
            pane_id: 1,
            key: "a".into(),
            code: "KeyA".into(),
            key_code: 65,
            state: KeyState::Down,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            repeat: false,
            timestamp: 0.0,
        };
        let json = encode_client_message(&msg).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("\"type\":\"key\""));
    }
}
