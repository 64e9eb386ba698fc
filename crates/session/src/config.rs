use crate::SessionError;
use glam::Vec3;
use gliderspace_kernel::{CameraConfig, GliderConfig, MIN_PICK_DISTANCE, ParameterStore};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything tunable about a session, loadable from JSON.
///
/// Missing fields take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub glider: GliderConfig,
    pub camera: CameraConfig,
    /// Initial parameter store values.
    pub params: ParameterStore,
    /// Maximum pick distance from the camera.
    pub pick_cutoff: f32,
    pub glider_start: Vec3,
    pub skybox_size: f32,
    pub fov_degrees: f32,
    /// Thruster emissive colour while the thrusters are on.
    pub thruster_glow: [f32; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            glider: GliderConfig::default(),
            camera: CameraConfig::default(),
            params: ParameterStore::default(),
            pick_cutoff: 120.0,
            glider_start: Vec3::new(0.0, 5.0, 0.0),
            skybox_size: 2000.0,
            fov_degrees: 60.0,
            thruster_glow: [0.3, 0.8, 1.0],
        }
    }
}

impl SessionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SessionError> {
        let g = &self.glider;
        let checks = [
            (g.extent_x > 0.0 && g.extent_z > 0.0, "glider extents must be positive"),
            (g.bounds_margin >= 1.0, "bounds margin must be at least 1"),
            (g.max_speed >= 0.0, "max speed must not be negative"),
            (g.acceleration >= 0.0 && g.deceleration >= 0.0, "acceleration must not be negative"),
            (self.pick_cutoff > MIN_PICK_DISTANCE, "pick cutoff must exceed the minimum pick distance"),
            (self.skybox_size > 0.0, "skybox size must be positive"),
            (self.camera.follow_rate >= 0.0, "follow rate must not be negative"),
            (self.params.gravity.is_finite(), "gravity must be finite"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, reason)) => Err(SessionError::Config(reason.to_string())),
            None => Ok(()),
        }
    }
}
