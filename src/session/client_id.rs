//! Persisted client identity (§4.5, §6.2): `dullahan_client_id` is read
//! from session storage or freshly generated and persisted back.

use uuid::Uuid;

use crate::session::capabilities::SessionStorage;

/// Storage key the client id is persisted under (§6.2).
pub const CLIENT_ID_KEY: &str = "dullahan_client_id";

/// Load this browser session's client id, generating and persisting a
/// fresh UUIDv4 if none is stored yet (§4.5).
pub fn load_or_create_client_id(storage: &dyn SessionStorage) -> String {
    if let Some(existing) = storage.get(CLIENT_ID_KEY) {
        if !existing.is_empty() {
            return existing;
        }
    }
    let fresh = Uuid::new_v4().to_string();
    storage.set(CLIENT_ID_KEY, &fresh);
    fresh
}
