use crate::backend::{NodeKind, Shape};
use crate::headless::HeadlessScene;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Frames stepped so far.
    pub frame: u64,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, -30.0),
            target: Vec3::new(0.0, 5.0, 0.0),
            fov_degrees: 60.0,
            frame: 0,
        }
    }
}

/// Renderer-agnostic interface over a headless scene.
///
/// A renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable description of the scene.
///
/// Used by the CLI and by tests to observe what a real engine would draw.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> String {
        let (w, h) = scene.viewport();
        let mut out = String::new();
        out.push_str(&format!("=== Frame {} ({w}x{h}) ===\n", view.frame));
        out.push_str(&format!("Nodes: {}\n", scene.node_count()));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (handle, node) in scene.nodes() {
            let Some(world) = scene.world_transform(handle) else {
                continue;
            };
            let p = world.position;
            match node.spec.kind {
                NodeKind::Object => {
                    let size = match node.spec.shape {
                        Shape::Sphere { radius } => radius * 2.0,
                        _ => 0.0,
                    };
                    out.push_str(&format!(
                        "  object {:<12} pos=({:.2}, {:.2}, {:.2}) d={:.1}{}\n",
                        node.spec.name,
                        p.x,
                        p.y,
                        p.z,
                        size,
                        if node.highlighted { " [selected]" } else { "" }
                    ));
                }
                NodeKind::ModelRoot => {
                    out.push_str(&format!(
                        "  model  {:<12} pos=({:.2}, {:.2}, {:.2})\n",
                        node.spec.name, p.x, p.y, p.z
                    ));
                }
                NodeKind::ModelPart if node.spec.emissive != [0.0; 3] => {
                    let e = node.spec.emissive;
                    out.push_str(&format!(
                        "    part {:<12} emissive=({:.2}, {:.2}, {:.2})\n",
                        node.spec.name, e[0], e[1], e[2]
                    ));
                }
                _ => {}
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NodeSpec, SceneBackend};
    use gliderspace_common::Transform;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = HeadlessScene::new(640, 480);
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("Frame 0 (640x480)"));
        assert!(output.contains("Nodes: 0"));
    }

    #[test]
    fn debug_renderer_lists_objects_and_selection() {
        let mut scene = HeadlessScene::default();
        let mars = scene
            .add_node(
                NodeSpec::new("Mars", NodeKind::Object, Shape::Sphere { radius: 1.5 })
                    .at(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
                    .pickable(),
            )
            .unwrap();
        scene.set_highlight(mars, true).unwrap();

        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("Nodes: 1"));
        assert!(output.contains("object Mars"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("[selected]"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!(view.frame, 0);
    }
}
