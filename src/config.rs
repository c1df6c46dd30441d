//! Session-storage-backed configuration (§6.2): client id is handled by
//! [`crate::session::client_id`]; this module covers the remaining keys —
//! `dullahan.keybinds`, `debug`, and the per-setting-name settings bag.

use serde_json::Value;

use crate::input::keybind::{parse_keybind, Keybind};
use crate::session::capabilities::SessionStorage;

/// Storage key for the keybind configuration array (§6.2).
pub const KEYBINDS_KEY: &str = "dullahan.keybinds";
/// Storage key for the verbose-logging flag (§6.2).
pub const DEBUG_KEY: &str = "debug";
/// Prefix under which opaque per-setting-name values live (theme, font,
/// cursor, bell, selection, mouse, developer - §6.2). The core round-trips
/// these as JSON values without interpreting them; interpretation belongs
/// to the UI layer.
const SETTING_KEY_PREFIX: &str = "dullahan.setting.";

/// The built-in keybind set used when `dullahan.keybinds` is absent or
/// fails to parse as a JSON array of strings.
fn default_keybind_entries() -> &'static [&'static str] {
    &[
        "performable:ctrl+shift+c=copy_to_clipboard",
        "ctrl+shift+v=paste_from_clipboard",
        "ctrl+shift+up=scroll:up:line",
        "ctrl+shift+down=scroll:down:line",
        "shift+pageup=scroll:up:page",
        "shift+pagedown=scroll:down:page",
        "ctrl+shift+t=new_window",
        "ctrl+shift+w=close_window",
        "performable:ctrl+alt+left=focus_pane:left",
        "performable:ctrl+alt+right=focus_pane:right",
        "performable:ctrl+alt+up=focus_pane:up",
        "performable:ctrl+alt+down=focus_pane:down",
        "performable:ctrl+tab=cycle_window:next",
        "performable:ctrl+shift+tab=cycle_window:prev",
        "ctrl+shift+a=select_all",
        "escape=clear_selection",
        "ctrl+shift+f=toggle_fullscreen",
        "ctrl+shift+comma=open_settings",
    ]
}

/// Load the configured keybind list (§6.2), falling back to the built-in
/// defaults when the stored value is absent or isn't a JSON array of
/// strings. Each individual entry that fails to parse is skipped and
/// logged; the rest of the list still loads (§7's `KEYBIND_PARSE_ERROR`
/// policy).
pub fn load_keybinds(storage: &dyn SessionStorage) -> Vec<Keybind> {
    let entries: Vec<String> = storage
        .get(KEYBINDS_KEY)
        .and_then(|json| serde_json::from_str::<Vec<String>>(&json).ok())
        .unwrap_or_else(|| default_keybind_entries().iter().map(|s| (*s).to_string()).collect());

    entries
        .iter()
        .filter_map(|entry| match parse_keybind(entry) {
            Ok(bind) => Some(bind),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        })
        .collect()
}

/// Persist a keybind configuration array verbatim, for a settings UI to
/// call after editing.
pub fn save_keybind_entries(storage: &dyn SessionStorage, entries: &[String]) {
    if let Ok(json) = serde_json::to_string(entries) {
        storage.set(KEYBINDS_KEY, &json);
    }
}

/// Whether verbose logging is requested (§6.2: `"true"` enables verbose
/// logs).
pub fn is_verbose(storage: &dyn SessionStorage) -> bool {
    storage.get(DEBUG_KEY).as_deref() == Some("true")
}

/// Set or clear the verbose-logging flag.
pub fn set_verbose(storage: &dyn SessionStorage, verbose: bool) {
    if verbose {
        storage.set(DEBUG_KEY, "true");
    } else {
        storage.remove(DEBUG_KEY);
    }
}

/// Read an opaque settings-bag entry by name (theme, font, cursor, bell,
/// selection, mouse, developer, ...). The core doesn't interpret the
/// value; it's returned as parsed JSON for the UI layer to act on.
pub fn get_setting(storage: &dyn SessionStorage, name: &str) -> Option<Value> {
    let raw = storage.get(&format!("{SETTING_KEY_PREFIX}{name}"))?;
    serde_json::from_str(&raw).ok()
}

/// Write a settings-bag entry by name.
pub fn set_setting(storage: &dyn SessionStorage, name: &str, value: &Value) {
    if let Ok(json) = serde_json::to_string(value) {
        storage.set(&format!("{SETTING_KEY_PREFIX}{name}"), &json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::capabilities::test_support::FakeStorage;

    #[test]
    fn falls_back_to_defaults_when_absent() {
        let storage = FakeStorage::default();
        let binds = load_keybinds(&storage);
        assert_eq!(binds.len(), default_keybind_entries().len());
    }

    #[test]
    fn bad_entries_are_skipped_independently() {
        let storage = FakeStorage::default();
        storage.set(KEYBINDS_KEY, r#"["ctrl+c=select_all", "not a keybind at all"]"#);
        let binds = load_keybinds(&storage);
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn falls_back_to_defaults_on_malformed_json() {
        let storage = FakeStorage::default();
        storage.set(KEYBINDS_KEY, "not json");
        let binds = load_keybinds(&storage);
        assert_eq!(binds.len(), default_keybind_entries().len());
    }

    #[test]
    fn verbose_flag_roundtrips() {
        let storage = FakeStorage::default();
        assert!(!is_verbose(&storage));
        set_verbose(&storage, true);
        assert!(is_verbose(&storage));
        set_verbose(&storage, false);
        assert!(!is_verbose(&storage));
    }

    #[test]
    fn settings_bag_roundtrips_opaque_json() {
        let storage = FakeStorage::default();
        let value = serde_json::json!({"family": "Menlo", "size": 14});
        set_setting(&storage, "font", &value);
        assert_eq!(get_setting(&storage, "font"), Some(value));
        assert_eq!(get_setting(&storage, "missing"), None);
    }
}
