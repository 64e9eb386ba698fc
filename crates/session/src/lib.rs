//! Session: one hosted scene, from build to teardown.
//!
//! A session owns the backend, the object registry, the glider, the camera,
//! the selection, the parameter store and the input buffer. Nothing is
//! global, so several sessions can run side by side.

mod builder;
mod config;
mod session;

pub use builder::{SceneHandles, build_scene};
pub use config::SessionConfig;
pub use session::{FrameReport, Session};

use gliderspace_assets::AssetError;
use gliderspace_kernel::ParamError;
use gliderspace_render::BackendError;

/// Errors from building or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid frame timestep {0}")]
    Timestep(f32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn crate_info() -> &'static str {
    "gliderspace-session v0.1.0"
}
