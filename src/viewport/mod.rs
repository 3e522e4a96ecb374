//! The viewport: scene, camera and renderer bound to a host canvas.
//!
//! A [`Viewport`] owns the engine handles and drives them from two entry
//! points. [`Viewport::frame`] runs one tick of the render loop and
//! [`Viewport::handle_input`] feeds host input to the built-in hover/click
//! interaction, the orbit controls and, once scripts are loaded, the event
//! channels. Behaviors attach to scene objects through
//! [`Viewport::load_scripts`].

mod interaction;

use std::time::Instant;

use glam::{Vec2, Vec3};

use crate::animation::{AnimationMixer, FlyTo, FlyToState, intro_clip};
use crate::core::camera::Camera;
use crate::core::config::ViewportConfig;
use crate::core::error::Error;
use crate::core::input::InputEvent;
use crate::core::orbit_controls::OrbitControls;
use crate::core::time::Clock;
use crate::core::types::Result;
use crate::events::{Channel, ChannelEvent, EventTable, Handler, HandlerScope, ListenerId, StartInfo, UnknownChannel};
use crate::host::{Canvas, FrameScheduler, Host, Navigator, SectionLabel};
use crate::render::Renderer;
use crate::scene::{Mesh, Object3D, SceneGraph, SceneNodeId};
use crate::script::{Export, Exports, ScriptContext, ScriptRegistry, ScriptUtils};

/// Objects added to the scene at construction
pub enum Objects {
    One(Object3D),
    Many(Vec<Object3D>),
}

impl Objects {
    fn into_vec(self) -> Vec<Object3D> {
        match self {
            Objects::One(object) => vec![object],
            Objects::Many(objects) => objects,
        }
    }
}

impl From<Object3D> for Objects {
    fn from(object: Object3D) -> Self {
        Objects::One(object)
    }
}

impl From<Mesh> for Objects {
    fn from(mesh: Mesh) -> Self {
        Objects::One(Object3D::mesh(mesh))
    }
}

impl From<Vec<Object3D>> for Objects {
    fn from(objects: Vec<Object3D>) -> Self {
        Objects::Many(objects)
    }
}

/// Construction options
#[derive(Default)]
pub struct ViewportOptions {
    pub objects: Option<Objects>,
}

impl ViewportOptions {
    pub fn with_objects(objects: impl Into<Objects>) -> Self {
        Self { objects: Some(objects.into()) }
    }
}

/// Pointer bookkeeping for hover and click detection
#[derive(Debug, Default)]
struct PointerState {
    /// Last pointer position in canvas box coordinates, `[0, 1]`
    position: Vec2,
    /// A pointer move has been seen, so `position` is meaningful
    tracked: bool,
    hovered: Option<SceneNodeId>,
    /// World-space bounds centre of the hovered object
    action_centre: Vec3,
    down: Vec2,
    up: Vec2,
    /// Set by pointer down, cleared by the next pointer up
    armed: bool,
}

pub struct Viewport {
    canvas: Box<dyn Canvas>,
    scheduler: Box<dyn FrameScheduler>,
    navigator: Box<dyn Navigator>,
    renderer: Box<dyn Renderer>,
    config: ViewportConfig,

    scene: SceneGraph,
    camera: Camera,
    controls: OrbitControls,
    mixer: AnimationMixer,
    fly_to: FlyTo,
    clock: Clock,

    events: EventTable,
    objects: Vec<SceneNodeId>,
    interactables: Vec<SceneNodeId>,
    pointer: PointerState,
    label: SectionLabel,

    width: u32,
    height: u32,
    /// No frame primitive on the host; nothing is ever drawn
    inert: bool,
    input_forwarding: bool,
}

impl Viewport {
    pub fn new(
        host: Host,
        renderer: impl Renderer + 'static,
        config: ViewportConfig,
        options: ViewportOptions,
    ) -> Self {
        let Host { canvas, scheduler, navigator } = host;

        let mut scene = SceneGraph::new();
        let objects: Vec<SceneNodeId> = options
            .objects
            .map(Objects::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|object| scene.add(object))
            .collect();

        let (width, height) = canvas.client_size();
        let aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
        let mut camera = Camera::new(
            config.camera.position(),
            config.camera.fov_degrees,
            aspect,
            config.camera.near,
            config.camera.far,
        );

        let controls = OrbitControls::new(&config.controls);
        camera.look_at(controls.target);

        let mut renderer: Box<dyn Renderer> = Box::new(renderer);
        renderer.set_pixel_ratio(config.renderer.pixel_ratio.unwrap_or(1.0));

        let inert = !scheduler.is_available();
        if inert {
            log::error!("Viewport: host has no frame scheduler, nothing will be rendered");
        }

        log::info!("Viewport: {} object(s), canvas {}x{}", objects.len(), width, height);

        let mut viewport = Self {
            canvas,
            scheduler,
            navigator,
            renderer,
            config,
            scene,
            camera,
            controls,
            mixer: AnimationMixer::new(),
            fly_to: FlyTo::new(),
            clock: Clock::new(),
            events: EventTable::new(),
            interactables: objects.clone(),
            objects,
            pointer: PointerState::default(),
            label: SectionLabel::new(),
            width,
            height,
            inert,
            input_forwarding: false,
        };

        viewport.set_enabled(false);
        viewport.resize(0, 0);
        if !viewport.inert {
            viewport.scheduler.request_frame();
        }
        viewport
    }

    /// Run one tick of the render loop
    pub fn frame(&mut self) -> Result<()> {
        self.frame_at(Instant::now())
    }

    /// [`Viewport::frame`] with an explicit wall-clock time
    pub fn frame_at(&mut self, now: Instant) -> Result<()> {
        if self.inert {
            return Ok(());
        }

        self.scene.update_matrix_world();
        self.camera.update_projection_matrix();

        let delta = self.clock.get_delta_at(now);
        let was_animating = self.fly_to.is_animating();
        let finished = self.mixer.update(delta, &mut self.camera);
        if let Some(href) = self.fly_to.on_finished(&finished) {
            log::info!("Viewport: navigating to {}", href);
            self.navigator.navigate(&href);
        }
        if was_animating && !self.fly_to.is_animating() {
            // Keep the clip's end pose; orbiting resumes from there
            self.controls.sync_to_camera(&self.camera);
        } else if !self.fly_to.is_animating() {
            self.controls.update(&mut self.camera, delta);
        }

        self.renderer.clear();

        if let Err(e) = self.dispatch(Channel::Update, None) {
            log::error!("Viewport: update handler failed: {}", e);
        }

        self.resize(0, 0);

        // Handlers may have moved objects
        self.scene.update_matrix_world();

        // The camera or the objects may have moved under a still pointer
        if let Err(e) = self.refresh_hover() {
            log::debug!("Viewport: hover refresh failed: {}", e);
        }

        self.renderer.render(&self.scene, &self.camera)?;

        self.scheduler.request_frame();
        Ok(())
    }

    /// Match camera aspect and renderer size to `width` x `height`.
    /// A zero dimension falls back to the canvas' current size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (canvas_width, canvas_height) = self.canvas.client_size();
        let width = if width == 0 { canvas_width } else { width };
        let height = if height == 0 { canvas_height } else { height };
        self.width = width;
        self.height = height;

        if height > 0 {
            self.camera.set_aspect(width as f32, height as f32);
            self.camera.update_projection_matrix();
        }
        self.renderer.set_size(width, height);
    }

    /// Host window was resized
    pub fn on_window_resize(&mut self) {
        self.resize(0, 0);
    }

    /// Feed one host input event.
    ///
    /// Built-in hover/click handling runs first, then the orbit controls
    /// (re-picking the hover when they move the camera), then the matching
    /// channel once input forwarding is on. A failure in one stage does not
    /// stop the others; the first error is returned.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        let internal = match event {
            InputEvent::MouseMove(p) => self.on_pointer_move(p),
            InputEvent::MouseDown(p) => {
                self.on_pointer_down(p);
                Ok(())
            }
            InputEvent::MouseUp(p) => self.on_pointer_up(p),
            _ => Ok(()),
        };

        let mut refreshed = Ok(());
        if !self.fly_to.is_animating() {
            let view_height = self.height as f32;
            if self.controls.handle_input(&mut self.camera, event, view_height) {
                refreshed = self.refresh_hover();
            }
        }

        let forwarded = match event.channel() {
            Some(channel) if self.input_forwarding => {
                self.dispatch(channel, Some(&ChannelEvent::Input(*event)))
            }
            _ => Ok(()),
        };

        internal.and(refreshed).and(forwarded)
    }

    /// Run every script in `registry` against its object, merge the exports,
    /// fire `start` once and switch on input forwarding.
    pub fn load_scripts(&mut self, registry: ScriptRegistry, project_path: &str) -> Result<()> {
        let utils = ScriptUtils::new(project_path);
        let mut loaded = Vec::with_capacity(registry.len());

        for (uuid, scripts) in registry {
            let this = self
                .scene
                .find_by_uuid(&uuid)
                .ok_or_else(|| Error::ObjectNotFound(uuid.clone()))?;

            for script in &scripts {
                let exports = {
                    let mut ctx = ScriptContext {
                        this,
                        project_path,
                        utils: &utils,
                        viewport: &mut *self,
                    };
                    script.run(&mut ctx)?
                };
                self.merge_exports(this, exports);
            }
            log::debug!("Viewport: loaded {} script(s) for {}", scripts.len(), uuid);
            loaded.push(uuid);
        }

        let start = ChannelEvent::Start(StartInfo {
            project_path: project_path.to_string(),
            objects: loaded,
        });
        self.dispatch(Channel::Start, Some(&start))?;

        if !self.input_forwarding {
            self.input_forwarding = true;
            log::debug!("Viewport: input forwarding enabled");
        }
        Ok(())
    }

    fn merge_exports(&mut self, this: SceneNodeId, exports: Exports) {
        for (name, export) in exports {
            match export {
                Export::Parameters(value) if name == "parameters" => {
                    if let Some(node) = self.scene.get_mut(this) {
                        node.parameters = Some(value);
                    }
                }
                Export::Handler(handler) => match name.parse::<Channel>() {
                    Ok(channel) => {
                        self.events.register(channel, Some(this), handler);
                    }
                    Err(e) => log::warn!("Viewport: {}", e),
                },
                Export::Parameters(_) => log::warn!("Viewport: {}", UnknownChannel(name)),
            }
        }
    }

    /// Invoke every handler on `channel` with `payload`
    pub fn dispatch(&mut self, channel: Channel, payload: Option<&ChannelEvent>) -> Result<()> {
        let mut scope = HandlerScope {
            this: None,
            scene: &mut self.scene,
            camera: &mut self.camera,
            interactables: &mut self.interactables,
        };
        self.events.dispatch(channel, payload, &mut scope)
    }

    /// Register a handler directly, outside of script loading
    pub fn register(&mut self, channel: Channel, target: Option<SceneNodeId>, handler: Handler) -> ListenerId {
        self.events.register(channel, target, handler)
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        self.events.unregister(id)
    }

    /// Play the descent intro. Ignored while another camera clip runs.
    pub fn play_intro(&mut self) -> bool {
        self.fly_to.start(&mut self.mixer, intro_clip(), None).is_some()
    }

    /// Make a node pickable by hover
    pub fn add_interactable(&mut self, id: SceneNodeId) {
        if !self.interactables.contains(&id) {
            self.interactables.push(id);
        }
    }

    /// Prefix of the click navigation target; `None` disables navigation
    pub fn set_base_url(&mut self, base_url: Option<String>) {
        self.config.base_url = base_url;
    }

    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    /// Objects added at construction, in order
    pub fn objects(&self) -> &[SceneNodeId] {
        &self.objects
    }

    pub fn interactables(&self) -> &[SceneNodeId] {
        &self.interactables
    }

    pub fn label(&self) -> &SectionLabel {
        &self.label
    }

    pub fn hovered(&self) -> Option<SceneNodeId> {
        self.pointer.hovered
    }

    pub fn action_centre(&self) -> Vec3 {
        self.pointer.action_centre
    }

    pub fn fly_to_state(&self) -> &FlyToState {
        self.fly_to.state()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_input_forwarding(&self) -> bool {
        self.input_forwarding
    }

    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }
}
