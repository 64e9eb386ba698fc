use crate::glider::GliderState;
use glam::Vec3;
use gliderspace_common::Ray;
use gliderspace_input::InputState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the camera moves each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Free-look chase: trails the glider and looks ahead of it.
    #[default]
    Follow,
    /// Detached from the glider; walked with the forward/right axes.
    Fixed,
}

impl CameraMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(Self::Follow),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!("unknown camera mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraConfig {
    /// Chase point in the glider's local frame (behind and above).
    pub follow_offset: Vec3,
    /// Look point in the glider's local frame.
    pub look_ahead: Vec3,
    /// Interpolation rate per second toward the chase and look points.
    pub follow_rate: f32,
    /// Units per second when walking the fixed camera.
    pub walk_speed: f32,
    pub start_position: Vec3,
    pub start_target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_offset: Vec3::new(0.0, 4.0, -14.0),
            look_ahead: Vec3::new(0.0, 0.0, 20.0),
            follow_rate: 4.0,
            walk_speed: 12.0,
            start_position: Vec3::new(0.0, 10.0, -30.0),
            start_target: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
        }
    }

    /// Ease toward the chase point behind the glider and the look point ahead.
    pub fn follow(&mut self, glider: &GliderState, cfg: &CameraConfig, dt: f32) {
        let t = (cfg.follow_rate * dt).clamp(0.0, 1.0);
        let chase = glider.position + glider.orientation * cfg.follow_offset;
        let look = glider.position + glider.orientation * cfg.look_ahead;
        self.position = self.position.lerp(chase, t);
        self.target = self.target.lerp(look, t);
        self.up = Vec3::Y;
    }

    /// Move position and target together along the horizontal view axes.
    pub fn walk(&mut self, input: &InputState, cfg: &CameraConfig, dt: f32) {
        let flat = Vec3::new(self.target.x - self.position.x, 0.0, self.target.z - self.position.z);
        let Some(forward) = flat.try_normalize() else {
            return;
        };
        let right = forward.cross(Vec3::Y);
        let delta = (forward * input.forward + right * input.right) * cfg.walk_speed * dt;
        self.position += delta;
        self.target += delta;
        self.up = Vec3::Y;
    }

    /// Pick ray from the camera toward its target, `cutoff` units long.
    pub fn pick_ray(&self, cutoff: f32) -> Option<Ray> {
        Ray::between(self.position, self.target, cutoff)
    }
}
