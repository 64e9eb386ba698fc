//! Shared types and geometry used across the gliderspace crates.
//!
//! # Invariants
//! - Mesh handles never own engine resources; they are plain ids.
//! - Rays carry a normalized direction and a finite length.

mod ray;
mod types;

pub use ray::{Ray, aabb_hit_distance, sphere_hit_distance};
pub use types::{MeshHandle, ObjectId, SessionId, Transform};

pub fn crate_info() -> &'static str {
    "gliderspace-common v0.1.0"
}
