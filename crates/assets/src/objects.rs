use crate::AssetError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One entry of the object data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectRecord {
    pub name: String,
    pub diameter: f32,
    pub position: [f32; 3],
    /// Texture reference, passed through to the backend untouched.
    pub image: String,
    #[serde(default)]
    pub rotation_speed: f32,
    #[serde(default)]
    pub orbit_radius: f32,
    #[serde(default)]
    pub orbit_speed: f32,
}

impl ObjectRecord {
    fn validate(&self, index: usize) -> Result<(), AssetError> {
        let fail = |reason: &str| AssetError::InvalidRecord {
            index,
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(fail("name is empty"));
        }
        let numbers = [
            self.diameter,
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation_speed,
            self.orbit_radius,
            self.orbit_speed,
        ];
        if numbers.iter().any(|v| !v.is_finite()) {
            return Err(fail("non-finite number"));
        }
        if self.diameter <= 0.0 {
            return Err(fail("diameter must be positive"));
        }
        if self.orbit_radius < 0.0 {
            return Err(fail("orbit radius must not be negative"));
        }
        Ok(())
    }
}

/// Ordered, validated list of object records.
///
/// Record order is significant: a record's index is the object index the
/// host sees in selection notifications.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCatalog {
    records: Vec<ObjectRecord>,
}

impl ObjectCatalog {
    /// Validate records, failing on the first bad one.
    pub fn from_records(records: Vec<ObjectRecord>) -> Result<Self, AssetError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            record.validate(index)?;
            if let Some(first) = seen.insert(record.name.as_str(), index) {
                return Err(AssetError::DuplicateName {
                    name: record.name.clone(),
                    first,
                    second: index,
                });
            }
        }
        Ok(Self { records })
    }

    pub fn from_json_str(json: &str) -> Result<Self, AssetError> {
        let records: Vec<ObjectRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Load the object data file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&data)?;
        tracing::info!(path = %path.display(), objects = catalog.len(), "loaded object catalog");
        Ok(catalog)
    }

    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
