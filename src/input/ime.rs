//! IME composition tracking (§4.4): while a composition is in progress,
//! keydown handling and raw `input` events are suppressed so the composed
//! text is sent exactly once, on `compositionend`.

/// Tracks whether an IME composition is currently in progress.
#[derive(Debug, Default)]
pub struct ImeHandler {
    composing: bool,
}

impl ImeHandler {
    /// A handler with no composition in progress.
    pub fn new() -> Self {
        ImeHandler { composing: false }
    }

    /// Whether a composition is currently in progress.
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// `compositionstart`.
    pub fn on_composition_start(&mut self) {
        self.composing = true;
    }

    /// `compositionupdate`; composition text isn't committed until
    /// `compositionend`, so there's nothing to emit here.
    pub fn on_composition_update(&mut self) {
        self.composing = true;
    }

    /// `compositionend`. Returns the final composed text to send, unless
    /// it's empty (a composition that was cancelled produces no text).
    pub fn on_composition_end(&mut self, final_text: &str) -> Option<String> {
        self.composing = false;
        if final_text.is_empty() {
            None
        } else {
            Some(final_text.to_string())
        }
    }

    /// A raw `input` event. Suppressed while composing, since the composed
    /// text will arrive via `on_composition_end` instead; otherwise passed
    /// through as typed text.
    pub fn on_input(&mut self, text: &str) -> Option<String> {
        if self.composing || text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Whether a keydown should be suppressed rather than forwarded as a
    /// literal keystroke: true while composing, and true by default except
    /// for a paste event, which is routed through the browser's own paste
    /// handling rather than keydown and so must be let through.
    pub fn should_suppress_keydown(&self, is_browser_paste: bool) -> bool {
        self.composing || !is_browser_paste
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_end_returns_final_text() {
        let mut ime = ImeHandler::new();
        ime.on_composition_start();
        assert!(ime.is_composing());
        let text = ime.on_composition_end("こんにちは");
        assert_eq!(text, Some("こんにちは".to_string()));
        assert!(!ime.is_composing());
    }

    #[test]
    fn composition_end_with_empty_text_returns_none() {
        let mut ime = ImeHandler::new();
        ime.on_composition_start();
        assert_eq!(ime.on_composition_end(""), None);
    }

    #[test]
    fn input_suppressed_while_composing() {
        let mut ime = ImeHandler::new();
        ime.on_composition_start();
        assert_eq!(ime.on_input("x"), None);
    }

    #[test]
    fn input_passes_through_when_not_composing() {
        let mut ime = ImeHandler::new();
        assert_eq!(ime.on_input("x"), Some("x".to_string()));
    }

    #[test]
    fn keydown_suppressed_by_default_except_browser_paste() {
        let mut ime = ImeHandler::new();
        assert!(ime.should_suppress_keydown(false));
        assert!(!ime.should_suppress_keydown(true));
        ime.on_composition_start();
        assert!(ime.should_suppress_keydown(false));
        assert!(ime.should_suppress_keydown(true));
    }
}
