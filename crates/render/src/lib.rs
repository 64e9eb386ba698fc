//! Rendering adapter: the backend trait a session drives, plus a headless
//! implementation.
//!
//! # Invariants
//! - The backend owns every node; the simulation holds handles only.
//! - Renderers never mutate the scene.
//! - A disposed backend refuses further work.

mod backend;
mod headless;
mod renderer;

pub use backend::{BackendError, LightKind, NodeKind, NodeSpec, SceneBackend, Shape};
pub use headless::{HeadlessScene, Node};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "gliderspace-render v0.1.0"
}
