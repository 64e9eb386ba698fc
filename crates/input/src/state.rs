use crate::action::{Action, KeyMap};
use std::collections::BTreeSet;

/// Key transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

/// Axis values for one frame, each in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub forward: f32,
    pub right: f32,
    pub thrust: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl InputState {
    /// True when every axis is zero.
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Held-key buffer between key events and the frame update.
///
/// Key events overwrite the held set (last writer wins); `snapshot` turns it
/// into axis values once per frame.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    keymap: KeyMap,
    held: BTreeSet<Action>,
}

impl InputBuffer {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            held: BTreeSet::new(),
        }
    }

    /// Record a key transition. Returns the bound action, or `None` for an
    /// unbound key (which is ignored).
    pub fn key_event(&mut self, key: &str, state: KeyState) -> Option<Action> {
        let Some(action) = self.keymap.lookup(key) else {
            tracing::trace!(key, "ignoring unbound key");
            return None;
        };
        match state {
            KeyState::Down => {
                self.held.insert(action);
            }
            KeyState::Up => {
                self.held.remove(&action);
            }
        }
        Some(action)
    }

    /// Release every held key (e.g. when the host loses focus).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn keymap_mut(&mut self) -> &mut KeyMap {
        &mut self.keymap
    }

    pub fn snapshot(&self) -> InputState {
        InputState {
            forward: self.axis(Action::Forward, Action::Backward),
            right: self.axis(Action::StrafeRight, Action::StrafeLeft),
            thrust: self.axis(Action::ThrustUp, Action::ThrustDown),
            yaw: self.axis(Action::YawRight, Action::YawLeft),
            pitch: self.axis(Action::PitchUp, Action::PitchDown),
        }
    }

    fn axis(&self, positive: Action, negative: Action) -> f32 {
        let mut v = 0.0;
        if self.held.contains(&positive) {
            v += 1.0;
        }
        if self.held.contains(&negative) {
            v -= 1.0;
        }
        v
    }
}
