use crate::backend::{BackendError, NodeKind, NodeSpec, SceneBackend, Shape};
use glam::Vec3;
use gliderspace_common::{MeshHandle, Ray, Transform, aabb_hit_distance, sphere_hit_distance};
use gliderspace_kernel::PickHit;
use std::collections::BTreeMap;

/// A node held by the headless scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub spec: NodeSpec,
    pub enabled: bool,
    pub visible: bool,
    pub highlighted: bool,
}

/// In-memory scene graph with ray picking and no GPU.
///
/// Stands in for a real engine in the CLI and in tests. Nodes are kept in a
/// BTreeMap so iteration follows creation order.
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    nodes: BTreeMap<MeshHandle, Node>,
    next_id: u64,
    viewport: (u32, u32),
    camera: Option<(Vec3, Vec3, Vec3)>,
    disposed: bool,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl HeadlessScene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            viewport: (width, height),
            camera: None,
            disposed: false,
        }
    }

    pub fn node(&self, handle: MeshHandle) -> Option<&Node> {
        self.nodes.get(&handle)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (MeshHandle, &Node)> {
        self.nodes.iter().map(|(h, n)| (*h, n))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn find(&self, name: &str) -> Option<MeshHandle> {
        self.nodes
            .iter()
            .find(|(_, n)| n.spec.name == name)
            .map(|(h, _)| *h)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    /// Current camera position, target and up, once placed.
    pub fn camera(&self) -> Option<(Vec3, Vec3, Vec3)> {
        self.camera
    }

    pub fn set_enabled(&mut self, node: MeshHandle, enabled: bool) -> Result<(), BackendError> {
        self.node_mut(node)?.enabled = enabled;
        Ok(())
    }

    /// Node transform composed with its parents'.
    pub fn world_transform(&self, handle: MeshHandle) -> Option<Transform> {
        let node = self.nodes.get(&handle)?;
        let local = node.spec.transform;
        let Some(parent) = node.spec.parent else {
            return Some(local);
        };
        let p = self.world_transform(parent)?;
        Some(Transform {
            position: p.position + p.rotation * (local.position * p.scale),
            rotation: (p.rotation * local.rotation).normalize(),
            scale: p.scale * local.scale,
        })
    }

    fn live(&self) -> Result<(), BackendError> {
        if self.disposed {
            Err(BackendError::Disposed)
        } else {
            Ok(())
        }
    }

    fn node_mut(&mut self, handle: MeshHandle) -> Result<&mut Node, BackendError> {
        self.live()?;
        self.nodes.get_mut(&handle).ok_or(BackendError::UnknownNode(handle))
    }

    fn hit_distance(&self, handle: MeshHandle, node: &Node, ray: &Ray) -> Option<f32> {
        let world = self.world_transform(handle)?;
        match node.spec.shape {
            Shape::None => None,
            Shape::Sphere { radius } => {
                sphere_hit_distance(ray, world.position, radius * world.scale.max_element())
            }
            Shape::Box { min, max } => {
                // Test in the node's local frame; distances are preserved
                // because only rotation and translation are undone.
                let inv = world.rotation.inverse();
                let local = Ray::new(
                    inv * (ray.origin - world.position),
                    inv * ray.direction,
                    ray.length,
                );
                aabb_hit_distance(&local, min * world.scale, max * world.scale)
            }
            Shape::Plane {
                half_width,
                half_depth,
            } => {
                if ray.direction.y.abs() < f32::EPSILON {
                    return None;
                }
                let t = (world.position.y - ray.origin.y) / ray.direction.y;
                if !(0.0..=ray.length).contains(&t) {
                    return None;
                }
                let p = ray.at(t) - world.position;
                (p.x.abs() <= half_width && p.z.abs() <= half_depth).then_some(t)
            }
        }
    }
}

impl SceneBackend for HeadlessScene {
    fn add_node(&mut self, spec: NodeSpec) -> Result<MeshHandle, BackendError> {
        self.live()?;
        if let Some(parent) = spec.parent {
            if !self.nodes.contains_key(&parent) {
                return Err(BackendError::Creation(format!(
                    "node {:?}: parent {parent:?} does not exist",
                    spec.name
                )));
            }
        }
        let handle = MeshHandle(self.next_id);
        self.next_id += 1;
        tracing::trace!(?handle, name = %spec.name, kind = ?spec.kind, "node added");
        self.nodes.insert(
            handle,
            Node {
                spec,
                enabled: true,
                visible: true,
                highlighted: false,
            },
        );
        Ok(handle)
    }

    fn set_transform(&mut self, node: MeshHandle, transform: Transform) -> Result<(), BackendError> {
        self.node_mut(node)?.spec.transform = transform;
        Ok(())
    }

    fn set_camera(&mut self, node: MeshHandle, position: Vec3, target: Vec3, up: Vec3) -> Result<(), BackendError> {
        let n = self.node_mut(node)?;
        if n.spec.kind != NodeKind::Camera {
            return Err(BackendError::UnknownNode(node));
        }
        n.spec.transform.position = position;
        self.camera = Some((position, target, up));
        Ok(())
    }

    fn set_emissive(&mut self, node: MeshHandle, emissive: [f32; 3]) -> Result<(), BackendError> {
        self.node_mut(node)?.spec.emissive = emissive;
        Ok(())
    }

    fn set_highlight(&mut self, node: MeshHandle, on: bool) -> Result<(), BackendError> {
        self.node_mut(node)?.highlighted = on;
        Ok(())
    }

    fn set_visible(&mut self, node: MeshHandle, visible: bool) -> Result<(), BackendError> {
        self.node_mut(node)?.visible = visible;
        Ok(())
    }

    fn pick(&self, ray: &Ray) -> Result<Option<PickHit>, BackendError> {
        self.live()?;
        let hit = self
            .nodes
            .iter()
            .filter(|(_, n)| n.spec.pickable && n.enabled && n.visible)
            .filter_map(|(h, n)| self.hit_distance(*h, n, ray).map(|d| (*h, n, d)))
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(mesh, node, distance)| PickHit {
                mesh,
                name: node.spec.name.clone(),
                distance,
            });
        Ok(hit)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.live()?;
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidViewport { width, height });
        }
        self.viewport = (width, height);
        tracing::debug!(width, height, "viewport resized");
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let released = self.nodes.len();
        self.nodes.clear();
        self.camera = None;
        self.disposed = true;
        tracing::info!(released, "headless scene disposed");
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
