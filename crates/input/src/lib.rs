//! Keyboard input mapped to glider/camera actions and a per-frame axis record.
//!
//! # Invariants
//! - Key events only mutate the held-action set; nothing is simulated here.
//! - Axis values are always in [-1, 1] and read once per frame.

pub mod action;
pub mod state;

pub use action::{Action, KeyMap};
pub use state::{InputBuffer, InputState, KeyState};

pub fn crate_info() -> &'static str {
    "gliderspace-input v0.1.0"
}
