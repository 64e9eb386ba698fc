use glam::Vec3;
use gliderspace_assets::{ObjectCatalog, ObjectRecord};
use gliderspace_common::{MeshHandle, ObjectId, Transform};
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Spin about the object's own Y axis, advanced once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spin {
    pub speed: f32,
    /// Accumulated yaw, kept in [0, 2π).
    pub angle: f32,
    pub active: bool,
}

/// Circular motion in the XZ plane around the world origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orbit {
    pub radius: f32,
    pub speed: f32,
    pub angle: f32,
    pub active: bool,
}

/// A planet or poster in the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub position: Vec3,
    pub diameter: f32,
    pub image: String,
    pub rotation: Spin,
    pub orbit: Orbit,
    /// Backend node, once created. Never disposed from here.
    pub mesh: Option<MeshHandle>,
}

impl SceneObject {
    pub fn from_record(id: ObjectId, record: &ObjectRecord) -> Self {
        let position = Vec3::from(record.position);
        Self {
            id,
            name: record.name.clone(),
            position,
            diameter: record.diameter,
            image: record.image.clone(),
            rotation: Spin {
                speed: record.rotation_speed,
                angle: 0.0,
                active: record.rotation_speed != 0.0,
            },
            orbit: Orbit {
                radius: record.orbit_radius,
                speed: record.orbit_speed,
                // Phase taken from where the object was placed; x = r·sin, z = r·cos.
                angle: position.x.atan2(position.z),
                active: record.orbit_radius > 0.0 && record.orbit_speed != 0.0,
            },
            mesh: None,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.position, self.rotation.angle)
    }

    /// Advance spin and orbit by one frame. Returns false when nothing moved.
    fn advance(&mut self) -> bool {
        let mut moved = false;
        if self.rotation.active {
            self.rotation.angle = (self.rotation.angle + self.rotation.speed).rem_euclid(TAU);
            moved = true;
        }
        if self.orbit.active && self.orbit.angle != 0.0 {
            self.position.x = self.orbit.radius * self.orbit.angle.sin();
            self.position.z = self.orbit.radius * self.orbit.angle.cos();
            self.orbit.angle += self.orbit.speed;
            moved = true;
        }
        moved
    }
}

/// Every scene object, in data-file order.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    objects: Vec<SceneObject>,
    by_name: HashMap<String, ObjectId>,
    by_mesh: HashMap<MeshHandle, ObjectId>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: &ObjectCatalog) -> Self {
        let mut registry = Self::new();
        for record in catalog.records() {
            registry.insert(record);
        }
        registry
    }

    /// Append an object built from `record`. Names are assumed unique
    /// (the catalog enforces this); a repeated name shadows the lookup.
    pub fn insert(&mut self, record: &ObjectRecord) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.by_name.insert(record.name.clone(), id);
        self.objects.push(SceneObject::from_record(id, record));
        id
    }

    /// Record the backend node for an object. Returns false for an unknown id.
    pub fn attach_mesh(&mut self, id: ObjectId, mesh: MeshHandle) -> bool {
        let Some(object) = self.objects.get_mut(id.0) else {
            return false;
        };
        if let Some(old) = object.mesh.replace(mesh) {
            self.by_mesh.remove(&old);
        }
        self.by_mesh.insert(mesh, id);
        true
    }

    /// Forget every mesh handle (the backend is about to release them).
    pub fn detach_all(&mut self) {
        for object in &mut self.objects {
            object.mesh = None;
        }
        self.by_mesh.clear();
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    pub fn find_by_mesh(&self, mesh: MeshHandle) -> Option<ObjectId> {
        self.by_mesh.get(&mesh).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Advance every loaded object by one frame.
    ///
    /// Objects without a mesh are skipped. Returns the new transforms of the
    /// meshes that moved, for the backend to apply.
    pub fn update(&mut self) -> Vec<(MeshHandle, Transform)> {
        let mut moved = Vec::new();
        for object in &mut self.objects {
            let Some(mesh) = object.mesh else {
                continue;
            };
            if object.advance() {
                moved.push((mesh, object.transform()));
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, position: [f32; 3], spin: f32, radius: f32, orbit: f32) -> ObjectRecord {
        ObjectRecord {
            name: name.to_string(),
            diameter: 2.0,
            position,
            image: format!("{name}.jpg"),
            rotation_speed: spin,
            orbit_radius: radius,
            orbit_speed: orbit,
        }
    }

    fn loaded(records: &[ObjectRecord]) -> ObjectRegistry {
        let mut reg = ObjectRegistry::new();
        for (i, r) in records.iter().enumerate() {
            let id = reg.insert(r);
            reg.attach_mesh(id, MeshHandle(100 + i as u64));
        }
        reg
    }

    #[test]
    fn flags_follow_record() {
        let obj = SceneObject::from_record(ObjectId(0), &record("a", [3.0, 0.0, 4.0], 0.1, 5.0, 0.01));
        assert!(obj.rotation.active);
        assert!(obj.orbit.active);
        assert!((obj.orbit.angle - 3.0f32.atan2(4.0)).abs() < 1e-6);

        let still = SceneObject::from_record(ObjectId(1), &record("b", [0.0; 3], 0.0, 0.0, 0.01));
        assert!(!still.rotation.active);
        assert!(!still.orbit.active);
    }

    #[test]
    fn rotation_accumulates_modulo_tau() {
        let speed = 0.37;
        let mut reg = loaded(&[record("spin", [0.0, 0.0, 0.0], speed, 0.0, 0.0)]);
        let frames = 100;
        for _ in 0..frames {
            reg.update();
        }
        let expected = (frames as f32 * speed).rem_euclid(TAU);
        let angle = reg.get(ObjectId(0)).unwrap().rotation.angle;
        assert!((angle - expected).abs() < 1e-3, "{angle} vs {expected}");
        assert!((0.0..TAU).contains(&angle));
    }

    #[test]
    fn orbit_stays_on_circle() {
        let mut reg = loaded(&[record("earth", [0.0, 2.0, 20.0], 0.0, 20.0, 0.05)]);
        // atan2(0, 20) == 0, so nudge it off the axis.
        reg.get_mut(ObjectId(0)).unwrap().orbit.angle = 0.3;
        for _ in 0..500 {
            reg.update();
            let p = reg.get(ObjectId(0)).unwrap().position;
            assert!(((p.x * p.x + p.z * p.z) - 400.0).abs() < 1e-2);
            assert_eq!(p.y, 2.0);
        }
    }

    #[test]
    fn orbit_with_zero_angle_is_frozen() {
        let mut reg = loaded(&[record("axis", [0.0, 0.0, 10.0], 0.0, 10.0, 0.05)]);
        reg.update();
        let obj = reg.get(ObjectId(0)).unwrap();
        assert_eq!(obj.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(obj.orbit.angle, 0.0);
    }

    #[test]
    fn objects_without_mesh_are_skipped() {
        let mut reg = ObjectRegistry::new();
        reg.insert(&record("ghost", [1.0, 0.0, 1.0], 0.5, 2.0, 0.1));
        assert!(reg.update().is_empty());
        assert_eq!(reg.get(ObjectId(0)).unwrap().rotation.angle, 0.0);
    }

    #[test]
    fn update_reports_moved_meshes_only() {
        let mut reg = loaded(&[
            record("still", [0.0; 3], 0.0, 0.0, 0.0),
            record("spin", [0.0; 3], 0.2, 0.0, 0.0),
        ]);
        let moved = reg.update();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].0, MeshHandle(101));
    }

    #[test]
    fn lookups_by_name_and_mesh() {
        let mut reg = loaded(&[record("a", [0.0; 3], 0.0, 0.0, 0.0), record("b", [0.0; 3], 0.0, 0.0, 0.0)]);
        assert_eq!(reg.find_by_name("b"), Some(ObjectId(1)));
        assert_eq!(reg.find_by_mesh(MeshHandle(100)), Some(ObjectId(0)));
        assert!(!reg.attach_mesh(ObjectId(7), MeshHandle(1)));

        reg.detach_all();
        assert_eq!(reg.find_by_mesh(MeshHandle(100)), None);
        assert!(reg.get(ObjectId(0)).unwrap().mesh.is_none());
    }
}
