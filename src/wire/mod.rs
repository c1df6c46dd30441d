//! The wire protocol codec (C1, §4.1, §6.1).
//!
//! Decoding an inbound frame goes `frame -> (msgpack bytes) -> ServerMessage`;
//! encoding an outbound message goes `ClientMessage -> JSON text`. Submodules
//! below handle the packed binary sub-formats (`cell`, `style`, `rowid`)
//! nested inside snapshot/delta payloads.

pub mod cell;
pub mod codec;
pub mod frame;
pub mod inbound;
pub mod outbound;
pub mod style;
pub mod rowid;

pub use codec::{decode_server_message, encode_client_message};
pub use inbound::ServerMessage;
pub use outbound::ClientMessage;
