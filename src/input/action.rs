//! Keybind action variants and the performable predicate (§4.4).

/// Scroll increment a `scroll` action moves by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAmount {
    /// One line.
    Line,
    /// Half a viewport page.
    HalfPage,
    /// A full viewport page.
    Page,
    /// Jump to the top of scrollback.
    Top,
    /// Jump to the bottom (live) position.
    Bottom,
}

/// Direction a `scroll` action moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Toward scrollback history.
    Up,
    /// Toward the live position.
    Down,
}

/// Direction a `cycle_window` action moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCycleDirection {
    /// Next window.
    Next,
    /// Previous window.
    Prev,
}

/// Direction a `focus_pane` action moves. Directional values that have no
/// pane to focus in that geometric direction fall back to `Next` - that
/// fallback is resolved by [`crate::session::layout`], which has the pane
/// geometry this enum alone doesn't carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocusDirection {
    /// Up.
    Up,
    /// Down.
    Down,
    /// Left.
    Left,
    /// Right.
    Right,
    /// Next pane in tab order.
    Next,
    /// Previous pane in tab order.
    Prev,
}

/// A keybind's dispatchable action (§4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Copy the current selection to the clipboard.
    CopyToClipboard,
    /// Paste clipboard contents into the active pane.
    PasteFromClipboard,
    /// Scroll the active pane's viewport.
    Scroll {
        /// Direction to scroll.
        direction: ScrollDirection,
        /// Amount to scroll by.
        amount: ScrollAmount,
    },
    /// Send literal text to the active pane, as if typed.
    SendText {
        /// The (already-unescaped) text to send.
        text: String,
    },
    /// Emit a form-feed (`\x0C`) to clear the screen.
    ClearScreen,
    /// Emit a full terminal reset (`\x1Bc`).
    ResetTerminal,
    /// Create a new window.
    NewWindow,
    /// Close the active window.
    CloseWindow,
    /// Switch to the window at `index` (1-based).
    SwitchWindow {
        /// 1-based target window index.
        index: u32,
    },
    /// Cycle through windows.
    CycleWindow {
        /// Direction to cycle.
        direction: WindowCycleDirection,
    },
    /// Move pane focus.
    FocusPane {
        /// Direction to move focus.
        direction: PaneFocusDirection,
    },
    /// Toggle fullscreen presentation.
    ToggleFullscreen,
    /// Open the settings UI.
    OpenSettings,
    /// Select the entire active pane's buffer.
    SelectAll,
    /// Clear the active selection.
    ClearSelection,
    /// No action; the key falls through to the server as regular input.
    None,
}

impl Action {
    /// The literal bytes this action sends directly to the pty, for the two
    /// variants that act by emitting a control sequence rather than
    /// dispatching to the session layer.
    pub fn literal_bytes(&self) -> Option<&'static [u8]> {
        match self {
            Action::ClearScreen => Some(b"\x0C"),
            Action::ResetTerminal => Some(b"\x1Bc"),
            _ => None,
        }
    }
}

/// Context the performable predicate needs: whether the active pane has a
/// non-empty selection, and the number of targets a directional/indexed
/// action would act on (window count for `switch_window`/`cycle_window`,
/// pane count for `focus_pane`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformableContext {
    /// Whether the active pane currently has a non-empty selection.
    pub has_selection: bool,
    /// Number of targets available to an indexed/cyclic action.
    pub target_count: usize,
}

impl Action {
    /// Whether this action can currently be performed (§4.4). A
    /// `performable:`-guarded binding whose predicate is false is treated as
    /// not matched at all; the key falls through as regular input.
    pub fn is_performable(&self, ctx: &PerformableContext) -> bool {
        match self {
            Action::CopyToClipboard => ctx.has_selection,
            Action::SwitchWindow { index } => {
                *index >= 1 && (*index as usize) <= ctx.target_count
            }
            Action::CycleWindow { .. } | Action::FocusPane { .. } => ctx.target_count >= 2,
            _ => true,
        }
    }
}
