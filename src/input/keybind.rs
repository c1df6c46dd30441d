//! Keybind grammar parser and matcher (§4.4):
//! `"[performable:]mod+mod+…+key=action[:param]"`.

use crate::error::CoreError;
use crate::input::action::{
    Action, PaneFocusDirection, PerformableContext, ScrollAmount, ScrollDirection, WindowCycleDirection,
};
use crate::input::escape::{escape, unescape};

/// The four modifier flags a keybind's combo carries, matched exactly
/// (§4.4: "all four modifier flags must match exactly").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Ctrl/Control.
    pub ctrl: bool,
    /// Alt/Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
    /// Meta/Super/Cmd/Command/Win/Windows.
    pub meta: bool,
}

/// One parsed keybind entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybind {
    /// Whether this binding only matches if its action's performable
    /// predicate is currently true.
    pub performable_guarded: bool,
    /// Required modifier state.
    pub modifiers: Modifiers,
    /// Normalized key token (lowercased for single printable characters;
    /// canonical name for recognized special keys; verbatim otherwise).
    pub key: String,
    /// The action to dispatch on a match.
    pub action: Action,
}

fn parse_modifier_token(tok: &str, entry: &str) -> Result<ModifierBit, CoreError> {
    match tok.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Ok(ModifierBit::Ctrl),
        "alt" | "opt" | "option" => Ok(ModifierBit::Alt),
        "shift" => Ok(ModifierBit::Shift),
        "meta" | "super" | "cmd" | "command" | "win" | "windows" => Ok(ModifierBit::Meta),
        other => Err(CoreError::KeybindParseError {
            entry: entry.to_string(),
            reason: format!("unknown modifier {other:?}"),
        }),
    }
}

enum ModifierBit {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

/// Canonicalize a key token (§4.4): single printable characters lowercase;
/// a small set of named-key and punctuation aliases map to a canonical
/// name; anything else (including unrecognized multi-character tokens) is
/// kept verbatim.
fn normalize_key_token(tok: &str) -> String {
    if tok.chars().count() == 1 {
        return tok.to_ascii_lowercase();
    }
    match tok.to_ascii_lowercase().as_str() {
        "return" => "enter".to_string(),
        "esc" => "escape".to_string(),
        "up" => "arrowup".to_string(),
        "down" => "arrowdown".to_string(),
        "left" => "arrowleft".to_string(),
        "right" => "arrowright".to_string(),
        "plus" => "+".to_string(),
        "minus" => "-".to_string(),
        "equals" => "=".to_string(),
        "comma" => ",".to_string(),
        "period" => ".".to_string(),
        "slash" => "/".to_string(),
        "semicolon" => ";".to_string(),
        "quote" => "'".to_string(),
        "backslash" => "\\".to_string(),
        "lbracket" => "[".to_string(),
        "rbracket" => "]".to_string(),
        "grave" => "`".to_string(),
        other => other.to_string(),
    }
}

fn parse_action(action_str: &str) -> Result<Action, String> {
    let (name, param) = match action_str.split_once(':') {
        Some((n, p)) => (n, Some(p)),
        None => (action_str, None),
    };
    match name {
        "copy_to_clipboard" => Ok(Action::CopyToClipboard),
        "paste_from_clipboard" => Ok(Action::PasteFromClipboard),
        "scroll" => {
            let param = param.ok_or("scroll requires a direction:amount param")?;
            let (direction, amount) =
                param.split_once(':').ok_or("scroll param must be direction:amount")?;
            let direction = match direction {
                "up" => ScrollDirection::Up,
                "down" => ScrollDirection::Down,
                other => return Err(format!("unknown scroll direction {other:?}")),
            };
            let amount = match amount {
                "line" => ScrollAmount::Line,
                "half_page" => ScrollAmount::HalfPage,
                "page" => ScrollAmount::Page,
                "top" => ScrollAmount::Top,
                "bottom" => ScrollAmount::Bottom,
                other => return Err(format!("unknown scroll amount {other:?}")),
            };
            Ok(Action::Scroll { direction, amount })
        }
        "send_text" => {
            let raw = param.ok_or("send_text requires a text param")?;
            let text = unescape(raw)?;
            Ok(Action::SendText { text })
        }
        "clear_screen" => Ok(Action::ClearScreen),
        "reset_terminal" => Ok(Action::ResetTerminal),
        "new_window" => Ok(Action::NewWindow),
        "close_window" => Ok(Action::CloseWindow),
        "switch_window" => {
            let param = param.ok_or("switch_window requires an index param")?;
            let index: u32 =
                param.parse().map_err(|_| format!("invalid switch_window index {param:?}"))?;
            Ok(Action::SwitchWindow { index })
        }
        "cycle_window" => {
            let param = param.ok_or("cycle_window requires a direction param")?;
            let direction = match param {
                "next" => WindowCycleDirection::Next,
                "prev" => WindowCycleDirection::Prev,
                other => return Err(format!("unknown cycle_window direction {other:?}")),
            };
            Ok(Action::CycleWindow { direction })
        }
        "focus_pane" => {
            let param = param.ok_or("focus_pane requires a direction param")?;
            let direction = match param {
                "up" => PaneFocusDirection::Up,
                "down" => PaneFocusDirection::Down,
                "left" => PaneFocusDirection::Left,
                "right" => PaneFocusDirection::Right,
                "next" => PaneFocusDirection::Next,
                "prev" => PaneFocusDirection::Prev,
                other => return Err(format!("unknown focus_pane direction {other:?}")),
            };
            Ok(Action::FocusPane { direction })
        }
        "toggle_fullscreen" => Ok(Action::ToggleFullscreen),
        "open_settings" => Ok(Action::OpenSettings),
        "select_all" => Ok(Action::SelectAll),
        "clear_selection" => Ok(Action::ClearSelection),
        "none" => Ok(Action::None),
        other => Err(format!("unknown action {other:?}")),
    }
}

/// Parse one keybind configuration entry (§4.4, §6.2). A bad entry is
/// meant to be skipped independently by the caller (`config.rs`), not to
/// abort loading the rest of the list.
///
/// # Errors
///
/// Returns [`CoreError::KeybindParseError`] if the entry doesn't match the
/// grammar: missing `=`, an empty combo, an unrecognized modifier, or an
/// unrecognized/malformed action.
pub fn parse_keybind(entry: &str) -> Result<Keybind, CoreError> {
    let (performable_guarded, rest) = match entry.strip_prefix("performable:") {
        Some(rest) => (true, rest),
        None => (false, entry),
    };

    let (combo, action_str) = rest.split_once('=').ok_or_else(|| CoreError::KeybindParseError {
        entry: entry.to_string(),
        reason: "missing '=' separating combo from action".to_string(),
    })?;

    let mut tokens: Vec<&str> = combo.split('+').collect();
    if tokens.iter().any(|t| t.is_empty()) || tokens.is_empty() {
        return Err(CoreError::KeybindParseError {
            entry: entry.to_string(),
            reason: "empty key combo or modifier token".to_string(),
        });
    }
    let key_token = tokens.pop().unwrap();

    let mut modifiers = Modifiers::default();
    for tok in tokens {
        match parse_modifier_token(tok, entry)? {
            ModifierBit::Ctrl => modifiers.ctrl = true,
            ModifierBit::Alt => modifiers.alt = true,
            ModifierBit::Shift => modifiers.shift = true,
            ModifierBit::Meta => modifiers.meta = true,
        }
    }

    let action = parse_action(action_str)
        .map_err(|reason| CoreError::KeybindParseError { entry: entry.to_string(), reason })?;

    Ok(Keybind { performable_guarded, modifiers, key: normalize_key_token(key_token), action })
}

/// Serialize an action back into its `name[:param]` grammar form, the
/// inverse of [`parse_action`].
fn format_action(action: &Action) -> String {
    match action {
        Action::CopyToClipboard => "copy_to_clipboard".to_string(),
        Action::PasteFromClipboard => "paste_from_clipboard".to_string(),
        Action::Scroll { direction, amount } => {
            let direction = match direction {
                ScrollDirection::Up => "up",
                ScrollDirection::Down => "down",
            };
            let amount = match amount {
                ScrollAmount::Line => "line",
                ScrollAmount::HalfPage => "half_page",
                ScrollAmount::Page => "page",
                ScrollAmount::Top => "top",
                ScrollAmount::Bottom => "bottom",
            };
            format!("scroll:{direction}:{amount}")
        }
        Action::SendText { text } => format!("send_text:{}", escape(text)),
        Action::ClearScreen => "clear_screen".to_string(),
        Action::ResetTerminal => "reset_terminal".to_string(),
        Action::NewWindow => "new_window".to_string(),
        Action::CloseWindow => "close_window".to_string(),
        Action::SwitchWindow { index } => format!("switch_window:{index}"),
        Action::CycleWindow { direction } => {
            let direction = match direction {
                WindowCycleDirection::Next => "next",
                WindowCycleDirection::Prev => "prev",
            };
            format!("cycle_window:{direction}")
        }
        Action::FocusPane { direction } => {
            let direction = match direction {
                PaneFocusDirection::Up => "up",
                PaneFocusDirection::Down => "down",
                PaneFocusDirection::Left => "left",
                PaneFocusDirection::Right => "right",
                PaneFocusDirection::Next => "next",
                PaneFocusDirection::Prev => "prev",
            };
            format!("focus_pane:{direction}")
        }
        Action::ToggleFullscreen => "toggle_fullscreen".to_string(),
        Action::OpenSettings => "open_settings".to_string(),
        Action::SelectAll => "select_all".to_string(),
        Action::ClearSelection => "clear_selection".to_string(),
        Action::None => "none".to_string(),
    }
}

impl Keybind {
    /// Serialize back to the `"[performable:]mod+mod+…+key=action[:param]"`
    /// grammar, the inverse of [`parse_keybind`] for combos built from
    /// canonical (non-alias) modifier and key tokens: `ctrl`/`alt`/`shift`/
    /// `meta` in that fixed order, and whatever key token `self.key` already
    /// holds (itself canonical, since [`normalize_key_token`] runs at parse
    /// time and never un-normalizes).
    pub fn format(&self) -> String {
        let mut combo = String::new();
        if self.modifiers.ctrl {
            combo.push_str("ctrl+");
        }
        if self.modifiers.alt {
            combo.push_str("alt+");
        }
        if self.modifiers.shift {
            combo.push_str("shift+");
        }
        if self.modifiers.meta {
            combo.push_str("meta+");
        }
        combo.push_str(&self.key);

        let prefix = if self.performable_guarded { "performable:" } else { "" };
        format!("{prefix}{combo}={}", format_action(&self.action))
    }
}

impl std::fmt::Display for Keybind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// Whether `pressed_key` matches this binding's key token (§4.4): case
/// insensitive for single-character keys, exact otherwise.
fn key_matches(bound_key: &str, pressed_key: &str) -> bool {
    if bound_key.chars().count() == 1 {
        bound_key.eq_ignore_ascii_case(pressed_key)
    } else {
        bound_key == pressed_key
    }
}

/// Find the first binding in `keybinds` whose combo matches
/// `(pressed_key, modifiers)` and whose action is currently performable
/// (§4.4). A combo match whose guard fails is skipped, not treated as a
/// terminal non-match, so a later binding for the same combo still gets a
/// chance.
pub fn find_match<'a>(
    keybinds: &'a [Keybind],
    pressed_key: &str,
    modifiers: Modifiers,
    ctx: &PerformableContext,
) -> Option<&'a Keybind> {
    keybinds.iter().find(|bind| {
        bind.modifiers == modifiers
            && key_matches(&bind.key, pressed_key)
            && (!bind.performable_guarded || bind.action.is_performable(ctx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_combo() {
        let bind = parse_keybind("ctrl+shift+c=copy_to_clipboard").unwrap();
        assert_eq!(bind.modifiers, Modifiers { ctrl: true, shift: true, alt: false, meta: false });
        assert_eq!(bind.key, "c");
        assert_eq!(bind.action, Action::CopyToClipboard);
        assert!(!bind.performable_guarded);
    }

    #[test]
    fn parses_performable_prefix() {
        let bind = parse_keybind("performable:ctrl+c=copy_to_clipboard").unwrap();
        assert!(bind.performable_guarded);
    }

    #[test]
    fn normalizes_modifier_aliases() {
        let bind = parse_keybind("cmd+opt+a=select_all").unwrap();
        assert!(bind.modifiers.meta);
        assert!(bind.modifiers.alt);
    }

    #[test]
    fn parses_action_with_colon_param() {
        let bind = parse_keybind("ctrl+up=scroll:up:page").unwrap();
        assert_eq!(bind.action, Action::Scroll { direction: ScrollDirection::Up, amount: ScrollAmount::Page });
    }

    #[test]
    fn parses_send_text_with_escapes() {
        let bind = parse_keybind("ctrl+l=send_text:\\x0C").unwrap();
        assert_eq!(bind.action, Action::SendText { text: "\u{0C}".to_string() });
    }

    #[test]
    fn rejects_unknown_modifier() {
        assert!(parse_keybind("hyper+a=select_all").is_err());
    }

    #[test]
    fn rejects_missing_equals() {
        assert!(parse_keybind("ctrl+a").is_err());
    }

    #[test]
    fn key_match_is_case_insensitive_for_single_chars() {
        assert!(key_matches("c", "C"));
        assert!(key_matches("c", "c"));
    }

    #[test]
    fn key_match_is_case_sensitive_for_named_keys() {
        assert!(key_matches("enter", "enter"));
        assert!(!key_matches("enter", "Enter"));
    }

    #[test]
    fn format_is_a_partial_inverse_of_parse_for_alias_free_combos() {
        let alias_free = [
            "ctrl+shift+c=copy_to_clipboard",
            "ctrl+up=scroll:up:page",
            "performable:ctrl+c=copy_to_clipboard",
            "ctrl+l=send_text:\\x0c",
            "alt+n=new_window",
            "meta+1=switch_window:1",
            "ctrl+alt+tab=cycle_window:next",
            "ctrl+shift+arrowleft=focus_pane:left",
            "z=none",
        ];
        for entry in alias_free {
            let parsed = parse_keybind(entry).unwrap();
            let reparsed = parse_keybind(&parsed.format()).unwrap();
            assert_eq!(reparsed, parsed, "round trip failed for {entry:?}");
        }
    }

    #[test]
    fn find_match_skips_binding_whose_guard_fails() {
        let binds = vec![parse_keybind("performable:ctrl+c=copy_to_clipboard").unwrap()];
        let ctx = PerformableContext { has_selection: false, target_count: 0 };
        let mods = Modifiers { ctrl: true, ..Default::default() };
        assert!(find_match(&binds, "c", mods, &ctx).is_none());

        let ctx = PerformableContext { has_selection: true, target_count: 0 };
        assert!(find_match(&binds, "c", mods, &ctx).is_some());
    }
}
