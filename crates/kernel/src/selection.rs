use crate::registry::ObjectRegistry;
use gliderspace_common::{MeshHandle, ObjectId};
use std::fmt;

/// Hits closer than this to the camera are ignored.
pub const MIN_PICK_DISTANCE: f32 = 0.5;

/// Closest mesh the pick ray touched.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub mesh: MeshHandle,
    pub name: String,
    /// Distance from the ray origin (the camera).
    pub distance: f32,
}

/// Notification delivered to the host when the selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    On(ObjectId),
    Off(ObjectId),
}

impl SelectionEvent {
    /// `"on"` or `"off"`, as the host UI expects.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::On(_) => "on",
            Self::Off(_) => "off",
        }
    }

    pub fn object(&self) -> ObjectId {
        match self {
            Self::On(id) | Self::Off(id) => *id,
        }
    }
}

impl fmt::Display for SelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.object().0)
    }
}

/// At most one selected object at a time.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    current: Option<ObjectId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ObjectId> {
        self.current
    }

    /// Turn a raw hit into a selection candidate.
    ///
    /// The hit mesh must be named after a registry object and lie in
    /// `(MIN_PICK_DISTANCE, cutoff]` from the camera.
    pub fn candidate(hit: Option<&PickHit>, registry: &ObjectRegistry, cutoff: f32) -> Option<ObjectId> {
        let hit = hit?;
        if hit.name.is_empty() || hit.distance <= MIN_PICK_DISTANCE || hit.distance > cutoff {
            return None;
        }
        registry.find_by_name(&hit.name)
    }

    /// Move to `candidate`, returning the events to raise in order.
    pub fn update(&mut self, candidate: Option<ObjectId>) -> Vec<SelectionEvent> {
        if self.current == candidate {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.current.take() {
            events.push(SelectionEvent::Off(previous));
        }
        if let Some(next) = candidate {
            events.push(SelectionEvent::On(next));
            self.current = Some(next);
        }
        events
    }

    /// Drop the selection, e.g. on teardown.
    pub fn clear(&mut self) -> Option<SelectionEvent> {
        self.current.take().map(SelectionEvent::Off)
    }
}
