//! Scene data loading: the planet/poster object list and the glider model.
//!
//! Records are validated when loaded; nothing downstream ever sees a
//! half-filled record.

mod model;
mod objects;

pub use model::{GLIDER_ROOT, GliderModel, ModelPart, PartRole};
pub use objects::{ObjectCatalog, ObjectRecord};

use std::path::PathBuf;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("object record {index} ({name:?}): {reason}")]
    InvalidRecord {
        index: usize,
        name: String,
        reason: String,
    },
    #[error("duplicate object name {name:?} at records {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
    #[error("glTF parse error: {0}")]
    GltfParse(String),
    #[error("glider model {path:?} is missing node {node:?}")]
    MissingNode { path: PathBuf, node: String },
}

pub fn crate_info() -> &'static str {
    "gliderspace-assets v0.1.0"
}
