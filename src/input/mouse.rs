//! Mouse/pointer handling (§4.4): button-state tracking, pixel→cell
//! conversion, and move-event deduplication/coalescing.

use crate::render::measure::CellMetricsSource;
use crate::wire::outbound::MouseState;

/// Which mouse buttons are currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtons {
    /// Left button.
    pub left: bool,
    /// Middle button.
    pub middle: bool,
    /// Right button.
    pub right: bool,
}

impl MouseButtons {
    /// The wire button code for the lowest-numbered pressed button, or `3`
    /// (none) if nothing is held (§4.1: `0` left, `1` middle, `2` right,
    /// `3` none).
    pub fn lowest_pressed(&self) -> u8 {
        if self.left {
            0
        } else if self.middle {
            1
        } else if self.right {
            2
        } else {
            3
        }
    }
}

/// Convert a pixel offset within a pane's content box to a 0-based cell
/// coordinate (§4.3/§4.4), using the same cell metrics the render pipeline
/// derives pane dimensions from.
pub fn pixel_to_cell(
    px: f64,
    py: f64,
    padding_left: f64,
    padding_top: f64,
    metrics: &dyn CellMetricsSource,
) -> (u16, u16) {
    let m = metrics.metrics();
    let x = ((px - padding_left) / m.cell_width).floor().max(0.0);
    let y = ((py - padding_top) / m.cell_height).floor().max(0.0);
    (x as u16, y as u16)
}

/// A mouse event ready to send to the server (§4.1's `mouse` message,
/// minus the fields the session layer fills in: pane id, modifiers,
/// timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEmit {
    /// Cell column.
    pub x: u16,
    /// Cell row.
    pub y: u16,
    /// Wire button code.
    pub button: u8,
    /// Event phase.
    pub state: MouseState,
}

/// Tracks held buttons and coalesces move events so a drag emits at most
/// one `move` per resolved cell rather than one per pixel (§4.4).
#[derive(Debug, Default)]
pub struct MouseHandler {
    buttons: MouseButtons,
    last_emitted: Option<(u16, u16)>,
    pending_move: Option<(u16, u16)>,
}

impl MouseHandler {
    /// A handler with no buttons held and no pending move.
    pub fn new() -> Self {
        MouseHandler::default()
    }

    /// A button was pressed at cell `(x, y)`.
    pub fn on_mouse_down(&mut self, button_index: u8, x: u16, y: u16) -> MouseEmit {
        match button_index {
            0 => self.buttons.left = true,
            1 => self.buttons.middle = true,
            2 => self.buttons.right = true,
            _ => {}
        }
        self.last_emitted = Some((x, y));
        MouseEmit { x, y, button: self.buttons.lowest_pressed(), state: MouseState::Down }
    }

    /// A button was released at cell `(x, y)`.
    pub fn on_mouse_up(&mut self, button_index: u8, x: u16, y: u16) -> MouseEmit {
        let button = match button_index {
            0 => 0,
            1 => 1,
            2 => 2,
            _ => 3,
        };
        match button_index {
            0 => self.buttons.left = false,
            1 => self.buttons.middle = false,
            2 => self.buttons.right = false,
            _ => {}
        }
        self.last_emitted = Some((x, y));
        MouseEmit { x, y, button, state: MouseState::Up }
    }

    /// Queue a move to cell `(x, y)`, overwriting any not-yet-flushed move.
    pub fn queue_move(&mut self, x: u16, y: u16) {
        self.pending_move = Some((x, y));
    }

    /// Flush the pending move, if any, and if it resolves to a different
    /// cell than the last emitted event - coalescing redundant moves within
    /// the same cell (§4.4).
    pub fn flush_move(&mut self) -> Option<MouseEmit> {
        let (x, y) = self.pending_move.take()?;
        if self.last_emitted == Some((x, y)) {
            return None;
        }
        self.last_emitted = Some((x, y));
        Some(MouseEmit { x, y, button: self.buttons.lowest_pressed(), state: MouseState::Move })
    }

    /// The pane was left; drop dedup/pending state so reentry always emits.
    pub fn on_mouse_leave(&mut self) {
        self.last_emitted = None;
        self.pending_move = None;
    }
}
