//! Input handling (§4.4): keybind grammar, keyboard/IME/mouse event
//! dispatch, and the shared action vocabulary they all target.

pub mod action;
pub mod escape;
pub mod ime;
pub mod keybind;
pub mod keyboard;
pub mod mouse;

pub use action::{Action, PaneFocusDirection, PerformableContext, ScrollAmount, ScrollDirection, WindowCycleDirection};
pub use ime::ImeHandler;
pub use keybind::{find_match, parse_keybind, Keybind, Modifiers};
pub use keyboard::{is_pure_modifier_code, KeyDownOutcome, KeyEvent, KeyUpOutcome, KeyboardHandler};
pub use mouse::{pixel_to_cell, MouseButtons, MouseEmit, MouseHandler};
