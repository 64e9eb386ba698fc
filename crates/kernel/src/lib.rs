//! Scene kernel: the per-frame state of the gallery and the glider.
//!
//! Nothing here talks to a rendering backend. Each update returns what the
//! caller must push to the backend (moved meshes, thruster changes,
//! selection events).
//!
//! # Invariants
//! - At most one object is selected at a time.
//! - Glider speed stays in [0, max_speed].
//! - Glider |x| and |z| stay within extent × margin.

pub mod camera;
pub mod glider;
pub mod params;
pub mod registry;
pub mod selection;

pub use camera::{Camera, CameraConfig, CameraMode};
pub use glider::{Glider, GliderConfig, GliderPhase, GliderState, GliderStep};
pub use params::{ParamError, ParamKey, ParamValue, ParameterStore};
pub use registry::{ObjectRegistry, Orbit, SceneObject, Spin};
pub use selection::{MIN_PICK_DISTANCE, PickHit, Selection, SelectionEvent};
