use crate::camera::CameraMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from parameter store access.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamError {
    #[error("unknown parameter {0:?}")]
    UnknownKey(String),
    #[error("parameter {key} expects {expected}, got {got}")]
    InvalidValue {
        key: ParamKey,
        expected: &'static str,
        got: ParamValue,
    },
}

/// The recognised parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Gravity,
    CameraMode,
    ThrustersOn,
    RenderLoop,
}

impl ParamKey {
    pub const ALL: [ParamKey; 4] = [
        ParamKey::Gravity,
        ParamKey::CameraMode,
        ParamKey::ThrustersOn,
        ParamKey::RenderLoop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gravity => "gravity",
            Self::CameraMode => "cameraMode",
            Self::ThrustersOn => "thrustersOn",
            Self::RenderLoop => "renderLoop",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKey {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParamError::UnknownKey(s.to_string()))
    }
}

/// A dynamically typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f32),
    Text(String),
}

impl ParamValue {
    /// Parse a command-line value: JSON literals first, bare text otherwise.
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|_| Self::Text(raw.to_string()))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Runtime parameters of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterStore {
    pub gravity: f32,
    pub camera_mode: CameraMode,
    pub thrusters_on: bool,
    pub render_loop: bool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            gravity: 0.0,
            camera_mode: CameraMode::Follow,
            thrusters_on: false,
            render_loop: true,
        }
    }
}

impl ParameterStore {
    pub fn get(&self, key: &str) -> Result<ParamValue, ParamError> {
        Ok(self.value(key.parse()?))
    }

    pub fn value(&self, key: ParamKey) -> ParamValue {
        match key {
            ParamKey::Gravity => ParamValue::Number(self.gravity),
            ParamKey::CameraMode => ParamValue::Text(self.camera_mode.as_str().to_string()),
            ParamKey::ThrustersOn => ParamValue::Bool(self.thrusters_on),
            ParamKey::RenderLoop => ParamValue::Bool(self.render_loop),
        }
    }

    /// Set a parameter by name. Nothing changes unless key and value are
    /// both valid.
    pub fn set(&mut self, key: &str, value: ParamValue) -> Result<ParamKey, ParamError> {
        let key: ParamKey = key.parse()?;
        let invalid = |expected, got: &ParamValue| ParamError::InvalidValue {
            key,
            expected,
            got: got.clone(),
        };
        match (key, &value) {
            (ParamKey::Gravity, ParamValue::Number(n)) if n.is_finite() => self.gravity = *n,
            (ParamKey::Gravity, v) => return Err(invalid("a finite number", v)),
            (ParamKey::CameraMode, ParamValue::Text(s)) => {
                self.camera_mode = s
                    .parse()
                    .map_err(|_| invalid("\"follow\" or \"fixed\"", &value))?;
            }
            (ParamKey::CameraMode, v) => return Err(invalid("\"follow\" or \"fixed\"", v)),
            (ParamKey::ThrustersOn, ParamValue::Bool(b)) => self.thrusters_on = *b,
            (ParamKey::RenderLoop, ParamValue::Bool(b)) => self.render_loop = *b,
            (ParamKey::ThrustersOn | ParamKey::RenderLoop, v) => return Err(invalid("a boolean", v)),
        }
        tracing::debug!(%key, %value, "parameter set");
        Ok(key)
    }

    /// Every parameter with its current value, in a fixed order.
    pub fn entries(&self) -> Vec<(ParamKey, ParamValue)> {
        ParamKey::ALL.into_iter().map(|k| (k, self.value(k))).collect()
    }
}
