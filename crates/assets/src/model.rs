use crate::AssetError;
use glam::Vec3;
use std::path::Path;

/// Name of the glider's root node.
pub const GLIDER_ROOT: &str = "SpaceGlider";

const THRUSTER_LEFT: &str = "ThrusterLeft";
const THRUSTER_RIGHT: &str = "ThrusterRight";
const DEFAULT_IDLE_EMISSIVE: [f32; 3] = [0.05, 0.2, 0.6];

/// What a glider part does for the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Hull,
    /// Emissive colour follows the thruster state.
    Thruster,
}

/// One child mesh of the glider model, with its local-space bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    pub name: String,
    pub role: PartRole,
    pub material: String,
    pub min: Vec3,
    pub max: Vec3,
}

/// The glider model: a root node with hull and thruster parts.
#[derive(Debug, Clone, PartialEq)]
pub struct GliderModel {
    pub parts: Vec<ModelPart>,
    /// Thruster emissive colour while the thrusters are off.
    pub idle_emissive: [f32; 3],
}

impl Default for GliderModel {
    /// The stock space glider: ellipsoid fuselage, two swept wings and two
    /// cylindrical thrusters either side of the tail.
    fn default() -> Self {
        let part = |name: &str, role, material: &str, min: [f32; 3], max: [f32; 3]| ModelPart {
            name: name.to_string(),
            role,
            material: material.to_string(),
            min: Vec3::from(min),
            max: Vec3::from(max),
        };
        Self {
            parts: vec![
                part("Fuselage", PartRole::Hull, "Hull", [-0.8, -0.6, -2.5], [0.8, 0.6, 2.5]),
                part("WingRight", PartRole::Hull, "Hull", [0.0, -0.025, -0.9], [4.0, 0.025, 1.3]),
                part("WingLeft", PartRole::Hull, "Hull", [-4.0, -0.025, -0.9], [0.0, 0.025, 1.3]),
                part(
                    THRUSTER_LEFT,
                    PartRole::Thruster,
                    "ThrusterLeftMat",
                    [-1.05, -0.35, -0.45],
                    [-0.35, 0.35, 0.45],
                ),
                part(
                    THRUSTER_RIGHT,
                    PartRole::Thruster,
                    "ThrusterRightMat",
                    [0.35, -0.35, -0.45],
                    [1.05, 0.35, 0.45],
                ),
            ],
            idle_emissive: DEFAULT_IDLE_EMISSIVE,
        }
    }
}

impl GliderModel {
    /// Union of all part bounds, in model space.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.parts.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(p.min), hi.max(p.max)),
        )
    }

    pub fn thrusters(&self) -> impl Iterator<Item = &ModelPart> {
        self.parts.iter().filter(|p| p.role == PartRole::Thruster)
    }

    /// Import the glider from a glTF JSON file.
    ///
    /// Only the node tree, materials and accessor bounds are read; vertex
    /// data stays with the rendering backend.
    pub fn import_gltf(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let json: serde_json::Value =
            serde_json::from_str(&data).map_err(|e| AssetError::GltfParse(e.to_string()))?;
        let model = Self::from_gltf_value(&json).map_err(|missing| match missing {
            Missing::Node(node) => AssetError::MissingNode {
                path: path.to_path_buf(),
                node,
            },
            Missing::Field(field) => AssetError::GltfParse(field),
        })?;
        tracing::info!(path = %path.display(), parts = model.parts.len(), "imported glider model");
        Ok(model)
    }

    fn from_gltf_value(json: &serde_json::Value) -> Result<Self, Missing> {
        let nodes = gltf_array(json, "nodes");
        let meshes = gltf_array(json, "meshes");
        let accessors = gltf_array(json, "accessors");
        let materials = gltf_array(json, "materials");

        let root = nodes
            .iter()
            .find(|n| n.get("name").and_then(|v| v.as_str()) == Some(GLIDER_ROOT))
            .ok_or_else(|| Missing::Node(GLIDER_ROOT.to_string()))?;
        let children = root
            .get("children")
            .and_then(|c| c.as_array())
            .ok_or_else(|| Missing::Field(format!("{GLIDER_ROOT} has no children")))?;

        let mut parts = Vec::new();
        let mut idle_emissive = None;
        for child in children.iter() {
            let Some(child) = child.as_u64() else {
                tracing::warn!(%child, "skipping non-index child of {GLIDER_ROOT}");
                continue;
            };
            let node = nodes
                .get(child as usize)
                .ok_or_else(|| Missing::Field(format!("node index {child} out of range")))?;
            let name = node
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or("unnamed")
                .to_string();
            let primitive = node
                .get("mesh")
                .and_then(|m| m.as_u64())
                .and_then(|m| meshes.get(m as usize))
                .and_then(|m| m.get("primitives"))
                .and_then(|p| p.get(0));

            let (min, max) = primitive
                .and_then(|p| p.get("attributes"))
                .and_then(|a| a.get("POSITION"))
                .and_then(|i| i.as_u64())
                .and_then(|i| accessors.get(i as usize))
                .and_then(|acc| Some((read_vec3(acc.get("min")?)?, read_vec3(acc.get("max")?)?)))
                .unwrap_or_else(|| {
                    tracing::warn!(part = %name, "part has no position bounds, using an empty box");
                    (Vec3::ZERO, Vec3::ZERO)
                });

            let material = primitive
                .and_then(|p| p.get("material"))
                .and_then(|i| i.as_u64())
                .and_then(|i| materials.get(i as usize));
            let material_name = material
                .and_then(|m| m.get("name"))
                .and_then(|n| n.as_str())
                .unwrap_or("default")
                .to_string();

            let role = if name == THRUSTER_LEFT || name == THRUSTER_RIGHT {
                PartRole::Thruster
            } else {
                PartRole::Hull
            };
            if role == PartRole::Thruster && idle_emissive.is_none() {
                idle_emissive = material
                    .and_then(|m| m.get("emissiveFactor"))
                    .and_then(read_vec3)
                    .map(|v| v.to_array());
            }
            parts.push(ModelPart {
                name,
                role,
                material: material_name,
                min,
                max,
            });
        }

        for required in [THRUSTER_LEFT, THRUSTER_RIGHT] {
            if !parts.iter().any(|p| p.name == required) {
                return Err(Missing::Node(required.to_string()));
            }
        }

        Ok(Self {
            parts,
            idle_emissive: idle_emissive.unwrap_or(DEFAULT_IDLE_EMISSIVE),
        })
    }
}

enum Missing {
    Node(String),
    Field(String),
}

fn gltf_array<'a>(json: &'a serde_json::Value, key: &str) -> &'a [serde_json::Value] {
    json.get(key)
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn read_vec3(value: &serde_json::Value) -> Option<Vec3> {
    let arr = value.as_array()?;
    if arr.len() < 3 {
        return None;
    }
    let mut out = [0.0f32; 3];
    for (slot, v) in out.iter_mut().zip(arr) {
        *slot = v.as_f64()? as f32;
    }
    Some(Vec3::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_gltf(json: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(json.to_string().as_bytes()).unwrap();
        tmp
    }

    fn sample_gltf(thrusters: &[&str]) -> serde_json::Value {
        let mut nodes = vec![serde_json::json!({ "name": "Fuselage", "mesh": 0 })];
        for name in thrusters {
            nodes.push(serde_json::json!({ "name": name, "mesh": 1 }));
        }
        let children: Vec<usize> = (0..nodes.len()).collect();
        nodes.push(serde_json::json!({ "name": GLIDER_ROOT, "children": children }));
        serde_json::json!({
            "nodes": nodes,
            "meshes": [
                { "name": "Fuselage", "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] },
                { "name": "Thruster", "primitives": [{ "attributes": { "POSITION": 1 }, "material": 1 }] }
            ],
            "accessors": [
                { "min": [-0.8, -0.6, -2.5], "max": [0.8, 0.6, 2.5] },
                { "min": [-0.35, -0.35, -0.45], "max": [0.35, 0.35, 0.45] }
            ],
            "materials": [
                { "name": "Hull" },
                { "name": "ThrusterMat", "emissiveFactor": [0.1, 0.2, 0.3] }
            ]
        })
    }

    #[test]
    fn builtin_model_has_two_thrusters() {
        let model = GliderModel::default();
        assert_eq!(model.parts.len(), 5);
        assert_eq!(model.thrusters().count(), 2);
        let (min, max) = model.bounds();
        assert_eq!(min, Vec3::new(-4.0, -0.6, -2.5));
        assert_eq!(max, Vec3::new(4.0, 0.6, 2.5));
    }

    #[test]
    fn imports_parts_bounds_and_emissive() {
        let tmp = write_gltf(&sample_gltf(&[THRUSTER_LEFT, THRUSTER_RIGHT]));
        let model = GliderModel::import_gltf(tmp.path()).unwrap();
        assert_eq!(model.parts.len(), 3);
        assert_eq!(model.parts[0].role, PartRole::Hull);
        assert_eq!(model.parts[0].max, Vec3::new(0.8, 0.6, 2.5));
        assert_eq!(model.parts[1].material, "ThrusterMat");
        assert_eq!(model.idle_emissive, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn bundled_model_matches_builtin() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/space_glider.gltf");
        let model = GliderModel::import_gltf(path).unwrap();
        assert_eq!(model.parts.len(), 5);
        let (min, max) = model.bounds();
        let (bmin, bmax) = GliderModel::default().bounds();
        assert!((min - bmin).abs().max_element() < 1e-6);
        assert!((max - bmax).abs().max_element() < 1e-6);
        assert_eq!(model.idle_emissive, DEFAULT_IDLE_EMISSIVE);
    }

    #[test]
    fn part_without_mesh_gets_empty_bounds() {
        let mut json = sample_gltf(&[THRUSTER_LEFT, THRUSTER_RIGHT]);
        json["nodes"][0] = serde_json::json!({ "name": "Fuselage" });
        json["nodes"][3]["children"] = serde_json::json!([0, "bogus", 1, 2]);
        let tmp = write_gltf(&json);
        let model = GliderModel::import_gltf(tmp.path()).unwrap();
        assert_eq!(model.parts.len(), 3);
        assert_eq!(model.parts[0].name, "Fuselage");
        assert_eq!((model.parts[0].min, model.parts[0].max), (Vec3::ZERO, Vec3::ZERO));
        assert_eq!(model.parts[0].material, "default");
    }

    #[test]
    fn missing_thruster_fails_import() {
        let tmp = write_gltf(&sample_gltf(&[THRUSTER_LEFT]));
        match GliderModel::import_gltf(tmp.path()) {
            Err(AssetError::MissingNode { node, .. }) => assert_eq!(node, THRUSTER_RIGHT),
            other => panic!("expected missing node, got {other:?}"),
        }
    }

    #[test]
    fn missing_root_fails_import() {
        let tmp = write_gltf(&serde_json::json!({ "nodes": [{ "name": "Other" }] }));
        assert!(matches!(
            GliderModel::import_gltf(tmp.path()),
            Err(AssetError::MissingNode { .. })
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"{ not json").unwrap();
        assert!(matches!(
            GliderModel::import_gltf(tmp.path()),
            Err(AssetError::GltfParse(_))
        ));
    }
}
