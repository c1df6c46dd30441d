//! Keydown/keyup dispatch (§4.4): routes a key event through the keybind
//! table, tracks which physical codes were consumed so the matching keyup
//! doesn't leak through as text input, and handles the bare-modifier case.

use std::collections::HashSet;

use crate::input::action::{Action, PerformableContext};
use crate::input::keybind::{find_match, Keybind, Modifiers};

/// A normalized key event, host-agnostic (no `web_sys::KeyboardEvent`).
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Physical key code (`event.code`), e.g. `"KeyC"`.
    pub code: String,
    /// Resolved key/character (`event.key`), e.g. `"c"`.
    pub key: String,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
    /// Whether an IME composition is in progress.
    pub is_composing: bool,
    /// Whether this is an OS key-repeat event.
    pub repeat: bool,
    /// Client-side event timestamp, milliseconds.
    pub timestamp: f64,
}

/// What a keydown should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyDownOutcome {
    /// Composing; the event is fully owned by the IME and ignored here.
    Ignored,
    /// A bare modifier key (Ctrl, Shift, ...) with no bound action; forward
    /// to the host for its own tracking, but don't send anything.
    ForwardModifier,
    /// A keybind matched; dispatch `action`, and if it took effect, record
    /// `consumed_code` so the paired keyup is suppressed too.
    ActionDispatched {
        /// The matched action.
        action: Action,
        /// The physical code to mark consumed.
        consumed_code: String,
    },
    /// No keybind matched; forward the event to the pane as regular input.
    Forward,
}

/// What a keyup should do.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyUpOutcome {
    /// A bare modifier release; forward for host tracking.
    ForwardModifier,
    /// The paired keydown was consumed by a keybind; don't forward.
    Suppressed,
    /// Forward to the pane.
    Forward,
}

/// Physical key codes that carry no character of their own (§4.4).
pub fn is_pure_modifier_code(code: &str) -> bool {
    matches!(
        code,
        "ControlLeft"
            | "ControlRight"
            | "ShiftLeft"
            | "ShiftRight"
            | "AltLeft"
            | "AltRight"
            | "MetaLeft"
            | "MetaRight"
            | "CapsLock"
            | "NumLock"
    )
}

/// Tracks consumed physical codes across a keydown/keyup pair and dispatches
/// through a fixed keybind table.
#[derive(Debug)]
pub struct KeyboardHandler {
    consumed_keys: HashSet<String>,
    keybinds: Vec<Keybind>,
}

impl KeyboardHandler {
    /// A handler bound to `keybinds`, in match-priority order.
    pub fn new(keybinds: Vec<Keybind>) -> Self {
        KeyboardHandler { consumed_keys: HashSet::new(), keybinds }
    }

    /// Clear consumed-key tracking, as done on focus loss (§4.4): a keyup
    /// that arrives after a blur has no paired keydown to match against.
    pub fn on_blur(&mut self) {
        self.consumed_keys.clear();
    }

    /// Handle a keydown event.
    pub fn on_keydown(&mut self, event: &KeyEvent, ctx: &PerformableContext) -> KeyDownOutcome {
        if event.is_composing {
            return KeyDownOutcome::Ignored;
        }
        if is_pure_modifier_code(&event.code) {
            return KeyDownOutcome::ForwardModifier;
        }
        match find_match(&self.keybinds, &event.key, event.modifiers, ctx) {
            Some(bind) if bind.action != Action::None => {
                self.consumed_keys.insert(event.code.clone());
                KeyDownOutcome::ActionDispatched {
                    action: bind.action.clone(),
                    consumed_code: event.code.clone(),
                }
            }
            Some(_) | None => KeyDownOutcome::Forward,
        }
    }

    /// Handle a keyup event.
    pub fn on_keyup(&mut self, event: &KeyEvent) -> KeyUpOutcome {
        if is_pure_modifier_code(&event.code) {
            return KeyUpOutcome::ForwardModifier;
        }
        if self.consumed_keys.remove(&event.code) {
            KeyUpOutcome::Suppressed
        } else {
            KeyUpOutcome::Forward
        }
    }

    /// Reset all tracked state, as done when the handler is torn down.
    pub fn detach(&mut self) {
        self.consumed_keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keybind::parse_keybind;

    fn event(code: &str, key: &str, modifiers: Modifiers) -> KeyEvent {
        KeyEvent {
            code: code.to_string(),
            key: key.to_string(),
            modifiers,
            is_composing: false,
            repeat: false,
            timestamp: 0.0,
        }
    }

    #[test]
    fn composing_event_is_ignored() {
        let mut handler = KeyboardHandler::new(vec![]);
        let mut e = event("KeyC", "c", Modifiers::default());
        e.is_composing = true;
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        assert_eq!(handler.on_keydown(&e, &ctx), KeyDownOutcome::Ignored);
    }

    #[test]
    fn bare_modifier_forwards_without_dispatch() {
        let mut handler = KeyboardHandler::new(vec![]);
        let e = event("ControlLeft", "Control", Modifiers::default());
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        assert_eq!(handler.on_keydown(&e, &ctx), KeyDownOutcome::ForwardModifier);
    }

    #[test]
    fn matched_keybind_dispatches_and_consumes_code() {
        let binds = vec![parse_keybind("ctrl+c=select_all").unwrap()];
        let mut handler = KeyboardHandler::new(binds);
        let e = event("KeyC", "c", Modifiers { ctrl: true, ..Default::default() });
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        let outcome = handler.on_keydown(&e, &ctx);
        assert_eq!(
            outcome,
            KeyDownOutcome::ActionDispatched { action: Action::SelectAll, consumed_code: "KeyC".to_string() }
        );

        let keyup = handler.on_keyup(&e);
        assert_eq!(keyup, KeyUpOutcome::Suppressed);
    }

    #[test]
    fn none_action_match_forwards_instead_of_dispatching() {
        let binds = vec![parse_keybind("ctrl+c=none").unwrap()];
        let mut handler = KeyboardHandler::new(binds);
        let e = event("KeyC", "c", Modifiers { ctrl: true, ..Default::default() });
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        assert_eq!(handler.on_keydown(&e, &ctx), KeyDownOutcome::Forward);
        assert_eq!(handler.on_keyup(&e), KeyUpOutcome::Forward);
    }

    #[test]
    fn unmatched_keydown_forwards_and_keyup_forwards() {
        let mut handler = KeyboardHandler::new(vec![]);
        let e = event("KeyX", "x", Modifiers::default());
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        assert_eq!(handler.on_keydown(&e, &ctx), KeyDownOutcome::Forward);
        assert_eq!(handler.on_keyup(&e), KeyUpOutcome::Forward);
    }

    #[test]
    fn blur_clears_consumed_keys() {
        let binds = vec![parse_keybind("ctrl+c=select_all").unwrap()];
        let mut handler = KeyboardHandler::new(binds);
        let e = event("KeyC", "c", Modifiers { ctrl: true, ..Default::default() });
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        handler.on_keydown(&e, &ctx);
        handler.on_blur();
        assert_eq!(handler.on_keyup(&e), KeyUpOutcome::Forward);
    }
}
