use crate::{SessionConfig, SessionError};
use glam::Vec3;
use gliderspace_assets::{GLIDER_ROOT, GliderModel, PartRole};
use gliderspace_common::{MeshHandle, Transform};
use gliderspace_kernel::{Camera, Glider, ObjectRegistry};
use gliderspace_render::{LightKind, NodeKind, NodeSpec, SceneBackend, Shape};

/// Backend nodes the frame loop drives directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHandles {
    pub camera: MeshHandle,
    pub lights: Vec<MeshHandle>,
    pub skybox: MeshHandle,
    pub ground: MeshHandle,
    pub glider_root: MeshHandle,
    pub thrusters: Vec<MeshHandle>,
}

/// Create the whole scene on `backend`.
///
/// Any backend failure aborts the build; the caller must not start a frame
/// loop on a half-built scene.
pub fn build_scene<B: SceneBackend>(
    backend: &mut B,
    config: &SessionConfig,
    registry: &mut ObjectRegistry,
    model: &GliderModel,
    glider: &Glider,
    camera: &Camera,
) -> Result<SceneHandles, SessionError> {
    let camera_node = backend.add_node(
        NodeSpec::new("camera", NodeKind::Camera, Shape::None).at(Transform::from_position(camera.position)),
    )?;
    backend.set_camera(camera_node, camera.position, camera.target, camera.up)?;

    let lights = vec![
        backend.add_node(NodeSpec::new(
            "hemi",
            NodeKind::Light(LightKind::Hemispheric { direction: Vec3::Y }),
            Shape::None,
        ))?,
        backend.add_node(NodeSpec::new(
            "sun",
            NodeKind::Light(LightKind::Point {
                position: Vec3::new(0.0, 200.0, 0.0),
            }),
            Shape::None,
        ))?,
    ];

    let skybox = backend.add_node(
        NodeSpec::new("skybox", NodeKind::Skybox, Shape::None)
            .at(Transform {
                scale: Vec3::splat(config.skybox_size),
                ..Transform::default()
            })
            .textured("skybox"),
    )?;

    let ground = backend.add_node(
        NodeSpec::new("ground", NodeKind::Ground, Shape::Plane {
            half_width: config.glider.extent_x,
            half_depth: config.glider.extent_z,
        })
        .textured("ground"),
    )?;

    let ids: Vec<_> = registry.iter().map(|o| o.id).collect();
    for id in ids {
        let Some(object) = registry.get(id) else {
            continue;
        };
        let mesh = backend.add_node(
            NodeSpec::new(object.name.clone(), NodeKind::Object, Shape::Sphere {
                radius: object.diameter / 2.0,
            })
            .at(object.transform())
            .textured(object.image.clone())
            .pickable(),
        )?;
        registry.attach_mesh(id, mesh);
    }

    let glider_root = backend.add_node(
        NodeSpec::new(GLIDER_ROOT, NodeKind::ModelRoot, Shape::None).at(glider.transform()),
    )?;
    let mut thrusters = Vec::new();
    for part in &model.parts {
        let emissive = match part.role {
            PartRole::Thruster => model.idle_emissive,
            PartRole::Hull => [0.0; 3],
        };
        let node = backend.add_node(
            NodeSpec::new(part.name.clone(), NodeKind::ModelPart, Shape::Box {
                min: part.min,
                max: part.max,
            })
            .child_of(glider_root)
            .textured(part.material.clone())
            .emissive(emissive),
        )?;
        if part.role == PartRole::Thruster {
            thrusters.push(node);
        }
    }

    tracing::info!(
        objects = registry.len(),
        parts = model.parts.len(),
        "scene built"
    );

    Ok(SceneHandles {
        camera: camera_node,
        lights,
        skybox,
        ground,
        glider_root,
        thrusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gliderspace_assets::ObjectCatalog;
    use gliderspace_render::{BackendError, HeadlessScene};

    const OBJECTS: &str = r#"[
        { "name": "Sun", "diameter": 10, "position": [0, 8, 40], "image": "sun.jpg" },
        { "name": "Mars", "diameter": 3, "position": [30, 6, 30], "image": "mars.jpg",
          "orbitRadius": 42, "orbitSpeed": 0.002 }
    ]"#;

    fn build(backend: &mut HeadlessScene) -> Result<(SceneHandles, ObjectRegistry), SessionError> {
        let config = SessionConfig::default();
        let catalog = ObjectCatalog::from_json_str(OBJECTS).unwrap();
        let mut registry = ObjectRegistry::from_catalog(&catalog);
        let glider = Glider::new(config.glider, config.glider_start);
        let camera = Camera::new(config.camera.start_position, config.camera.start_target);
        let handles = build_scene(
            backend,
            &config,
            &mut registry,
            &GliderModel::default(),
            &glider,
            &camera,
        )?;
        Ok((handles, registry))
    }

    #[test]
    fn builds_every_node() {
        let mut scene = HeadlessScene::default();
        let (handles, registry) = build(&mut scene).unwrap();
        // camera + 2 lights + skybox + ground + 2 objects + root + 5 parts
        assert_eq!(scene.node_count(), 13);
        assert_eq!(handles.thrusters.len(), 2);
        assert!(registry.iter().all(|o| o.mesh.is_some()));
        assert!(scene.camera().is_some());
    }

    #[test]
    fn only_objects_are_pickable() {
        let mut scene = HeadlessScene::default();
        let (handles, registry) = build(&mut scene).unwrap();
        let pickable: Vec<_> = scene
            .nodes()
            .filter(|(_, n)| n.spec.pickable)
            .map(|(h, _)| h)
            .collect();
        let meshes: Vec<_> = registry.iter().filter_map(|o| o.mesh).collect();
        assert_eq!(pickable, meshes);
        assert!(!scene.node(handles.ground).unwrap().spec.pickable);
    }

    #[test]
    fn thrusters_start_with_idle_glow() {
        let mut scene = HeadlessScene::default();
        let (handles, _) = build(&mut scene).unwrap();
        for t in handles.thrusters {
            assert_eq!(scene.node(t).unwrap().spec.emissive, [0.05, 0.2, 0.6]);
        }
    }

    #[test]
    fn disposed_backend_fails_the_build() {
        let mut scene = HeadlessScene::default();
        scene.dispose();
        assert!(matches!(
            build(&mut scene),
            Err(SessionError::Backend(BackendError::Disposed))
        ));
    }
}
