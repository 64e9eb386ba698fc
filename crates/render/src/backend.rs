use glam::Vec3;
use gliderspace_common::{MeshHandle, Ray, Transform};
use gliderspace_kernel::PickHit;

/// Errors from backend operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BackendError {
    #[error("backend has been disposed")]
    Disposed,
    #[error("unknown node {0:?}")]
    UnknownNode(MeshHandle),
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
    #[error("failed to create {0}")]
    Creation(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Sky/ground fill light from a direction.
    Hemispheric { direction: Vec3 },
    Point { position: Vec3 },
}

/// What a node is for; used by renderers and for teardown order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Camera,
    Light(LightKind),
    Skybox,
    Ground,
    /// A gallery object (planet or poster).
    Object,
    /// Transform-only parent of a loaded model.
    ModelRoot,
    ModelPart,
}

/// Geometry used for ray picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    None,
    Sphere { radius: f32 },
    /// Axis-aligned in the node's local frame.
    Box { min: Vec3, max: Vec3 },
    /// Horizontal rectangle through the node origin.
    Plane { half_width: f32, half_depth: f32 },
}

/// Everything needed to create one scene-graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub kind: NodeKind,
    pub shape: Shape,
    pub transform: Transform,
    pub parent: Option<MeshHandle>,
    pub pickable: bool,
    pub texture: Option<String>,
    pub emissive: [f32; 3],
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, kind: NodeKind, shape: Shape) -> Self {
        Self {
            name: name.into(),
            kind,
            shape,
            transform: Transform::default(),
            parent: None,
            pickable: false,
            texture: None,
            emissive: [0.0; 3],
        }
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn child_of(mut self, parent: MeshHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn pickable(mut self) -> Self {
        self.pickable = true;
        self
    }

    pub fn textured(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self
    }
}

/// The rendering engine as seen by a session.
///
/// The backend owns every node; callers hold `MeshHandle`s only. After
/// `dispose` every call fails with `BackendError::Disposed`.
pub trait SceneBackend {
    fn add_node(&mut self, spec: NodeSpec) -> Result<MeshHandle, BackendError>;

    fn set_transform(&mut self, node: MeshHandle, transform: Transform) -> Result<(), BackendError>;

    /// Place the active camera.
    fn set_camera(&mut self, node: MeshHandle, position: Vec3, target: Vec3, up: Vec3) -> Result<(), BackendError>;

    fn set_emissive(&mut self, node: MeshHandle, emissive: [f32; 3]) -> Result<(), BackendError>;

    /// Show or hide the glow ring around a node.
    fn set_highlight(&mut self, node: MeshHandle, on: bool) -> Result<(), BackendError>;

    fn set_visible(&mut self, node: MeshHandle, visible: bool) -> Result<(), BackendError>;

    /// Closest pickable, enabled and visible node along `ray`.
    fn pick(&self, ray: &Ray) -> Result<Option<PickHit>, BackendError>;

    /// Recompute the viewport after the host surface changed size.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    /// Release every node. Idempotent.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}
