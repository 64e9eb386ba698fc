use std::collections::BTreeMap;

/// A high-level action that a key can produce.
///
/// The session consumes axis values built from actions, never raw key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Walk the fixed camera forward.
    Forward,
    /// Walk the fixed camera backward.
    Backward,
    /// Strafe the fixed camera right.
    StrafeRight,
    /// Strafe the fixed camera left.
    StrafeLeft,
    /// Accelerate the glider.
    ThrustUp,
    /// Decelerate the glider.
    ThrustDown,
    YawLeft,
    YawRight,
    /// Climb.
    PitchUp,
    /// Dive.
    PitchDown,
}

/// Binding table from key names (as reported by the host) to actions.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: BTreeMap<String, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind("w", Action::Forward);
        map.bind("s", Action::Backward);
        map.bind("d", Action::StrafeRight);
        map.bind("a", Action::StrafeLeft);
        map.bind("ArrowUp", Action::ThrustUp);
        map.bind("ArrowDown", Action::ThrustDown);
        map.bind("ArrowLeft", Action::YawLeft);
        map.bind("ArrowRight", Action::YawRight);
        map.bind("q", Action::PitchUp);
        map.bind("e", Action::PitchDown);
        map
    }
}

impl KeyMap {
    /// A map with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind a key, replacing any previous binding for it.
    ///
    /// Single-character keys are matched case-insensitively.
    pub fn bind(&mut self, key: &str, action: Action) {
        self.bindings.insert(normalize_key(key), action);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.bindings.remove(&normalize_key(key))
    }

    pub fn lookup(&self, key: &str) -> Option<Action> {
        self.bindings.get(&normalize_key(key)).copied()
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}
