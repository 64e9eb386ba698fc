use crate::builder::{SceneHandles, build_scene};
use crate::{SessionConfig, SessionError};
use gliderspace_assets::{GliderModel, ObjectCatalog};
use gliderspace_common::SessionId;
use gliderspace_input::{Action, InputBuffer, KeyMap, KeyState};
use gliderspace_kernel::{
    Camera, CameraMode, Glider, GliderStep, ObjectRegistry, ParamKey, ParamValue, ParameterStore,
    Selection, SelectionEvent,
};
use gliderspace_render::{RenderView, SceneBackend};

type SelectionListener = Box<dyn FnMut(SelectionEvent)>;

/// Outcome of one `Session::frame` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Frame number after this call.
    pub frame: u64,
    /// True when the render loop is off and nothing ran.
    pub skipped: bool,
    pub moved_objects: usize,
    pub glider: GliderStep,
    /// Selection notifications raised this frame, in order.
    pub events: Vec<SelectionEvent>,
}

/// One hosted scene.
pub struct Session<B: SceneBackend> {
    id: SessionId,
    span: tracing::Span,
    config: SessionConfig,
    backend: B,
    handles: SceneHandles,
    idle_glow: [f32; 3],
    registry: ObjectRegistry,
    glider: Glider,
    camera: Camera,
    selection: Selection,
    params: ParameterStore,
    input: InputBuffer,
    listeners: Vec<SelectionListener>,
    frame: u64,
}

impl<B: SceneBackend> Session<B> {
    /// Build the scene on `backend`. On error nothing is left running and
    /// the backend is released.
    pub fn build(
        mut backend: B,
        catalog: &ObjectCatalog,
        model: &GliderModel,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let id = SessionId::new();
        let span = tracing::info_span!("session", id = %id);
        let _guard = span.enter();

        if let Err(err) = config.validate() {
            backend.dispose();
            return Err(err);
        }
        let mut registry = ObjectRegistry::from_catalog(catalog);
        let glider = Glider::new(config.glider, config.glider_start);
        let camera = Camera::new(config.camera.start_position, config.camera.start_target);

        let handles = match build_scene(&mut backend, &config, &mut registry, model, &glider, &camera) {
            Ok(handles) => handles,
            Err(err) => {
                tracing::error!(%err, "scene build failed");
                backend.dispose();
                return Err(err);
            }
        };

        let params = config.params.clone();
        let mut session = Self {
            id,
            span: span.clone(),
            config,
            backend,
            handles,
            idle_glow: model.idle_emissive,
            registry,
            glider,
            camera,
            selection: Selection::new(),
            params,
            input: InputBuffer::new(KeyMap::default()),
            listeners: Vec::new(),
            frame: 0,
        };
        if session.params.thrusters_on {
            session.glider.set_thrusters(true);
            if let Err(err) = session.sync_thrusters() {
                tracing::error!(%err, "thruster setup failed");
                session.backend.dispose();
                return Err(err);
            }
        }
        tracing::info!(objects = session.registry.len(), "session ready");
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn glider(&self) -> &Glider {
        &self.glider
    }

    pub fn glider_mut(&mut self) -> &mut Glider {
        &mut self.glider
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// Register a selection listener, called with every on/off event.
    pub fn on_selection(&mut self, listener: impl FnMut(SelectionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Buffer a key transition for the next frame.
    pub fn key_event(&mut self, key: &str, state: KeyState) -> Option<Action> {
        self.input.key_event(key, state)
    }

    pub fn get_param(&self, key: &str) -> Result<ParamValue, SessionError> {
        Ok(self.params.get(key)?)
    }

    /// Set a parameter and apply its side effects.
    pub fn set_param(&mut self, key: &str, value: ParamValue) -> Result<(), SessionError> {
        let key = self.params.set(key, value)?;
        match key {
            ParamKey::ThrustersOn => {
                if self.glider.set_thrusters(self.params.thrusters_on) {
                    self.sync_thrusters()?;
                }
            }
            ParamKey::RenderLoop => {
                tracing::info!(parent: &self.span, running = self.params.render_loop, "render loop toggled");
            }
            ParamKey::Gravity | ParamKey::CameraMode => {}
        }
        Ok(())
    }

    /// Forward a host surface resize to the backend.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        Ok(self.backend.resize(width, height)?)
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.camera.position,
            target: self.camera.target,
            fov_degrees: self.config.fov_degrees,
            frame: self.frame,
        }
    }

    /// Run one frame: objects, glider, camera, then selection.
    ///
    /// `dt` must be finite and non-negative; otherwise nothing runs.
    pub fn frame(&mut self, dt: f32) -> Result<FrameReport, SessionError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SessionError::Timestep(dt));
        }
        if !self.params.render_loop {
            return Ok(FrameReport {
                frame: self.frame,
                skipped: true,
                ..FrameReport::default()
            });
        }
        let span = self.span.clone();
        let _guard = span.enter();

        let moved = self.registry.update();
        for (mesh, transform) in &moved {
            self.backend.set_transform(*mesh, *transform)?;
        }

        let input = self.input.snapshot();
        let step = self.glider.update(&input, dt, self.params.gravity);
        self.backend
            .set_transform(self.handles.glider_root, self.glider.transform())?;
        self.params.thrusters_on = self.glider.state().thrusters_on;
        if step.thrusters_changed {
            self.sync_thrusters()?;
        }

        match self.params.camera_mode {
            CameraMode::Follow => self.camera.follow(self.glider.state(), &self.config.camera, dt),
            CameraMode::Fixed => self.camera.walk(&input, &self.config.camera, dt),
        }
        self.backend.set_camera(
            self.handles.camera,
            self.camera.position,
            self.camera.target,
            self.camera.up,
        )?;

        let events = self.update_selection()?;

        self.frame += 1;
        Ok(FrameReport {
            frame: self.frame,
            skipped: false,
            moved_objects: moved.len(),
            glider: step,
            events,
        })
    }

    /// Tear down: stop the loop, drop listeners and input, then release the
    /// backend. Returns the released backend.
    pub fn dispose(mut self) -> B {
        let _guard = self.span.clone().entered();
        self.params.render_loop = false;
        self.listeners.clear();
        self.input.clear();
        self.selection.clear();
        self.registry.detach_all();
        self.backend.dispose();
        tracing::info!(frames = self.frame, "session disposed");
        self.backend
    }

    fn update_selection(&mut self) -> Result<Vec<SelectionEvent>, SessionError> {
        let cutoff = self.config.pick_cutoff;
        let hit = match self.camera.pick_ray(cutoff) {
            Some(ray) => self.backend.pick(&ray)?,
            None => None,
        };
        let candidate = Selection::candidate(hit.as_ref(), &self.registry, cutoff);
        let events = self.selection.update(candidate);

        for event in &events {
            let (id, on) = match *event {
                SelectionEvent::On(id) => (id, true),
                SelectionEvent::Off(id) => (id, false),
            };
            if let Some(mesh) = self.registry.get(id).and_then(|o| o.mesh) {
                self.backend.set_highlight(mesh, on)?;
            }
            tracing::debug!(%event, "selection changed");
            for listener in &mut self.listeners {
                listener(*event);
            }
        }
        Ok(events)
    }

    fn sync_thrusters(&mut self) -> Result<(), SessionError> {
        let glow = if self.glider.state().thrusters_on {
            self.config.thruster_glow
        } else {
            self.idle_glow
        };
        for thruster in &self.handles.thrusters {
            self.backend.set_emissive(*thruster, glow)?;
        }
        Ok(())
    }
}
