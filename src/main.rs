//! zviewport - native demo viewer

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;
use serde_json::json;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use zviewport::core::{
    config::ViewportConfig,
    error::Error,
    input::{InputEvent, InputState},
    logging,
    types::Result,
};
use zviewport::host::{self, Host, LogNavigator, WindowCanvas, WindowConfig, WindowScheduler};
use zviewport::render::{GpuContext, GpuRenderer};
use zviewport::scene::{Geometry, Material, Mesh, Object3D};
use zviewport::script::{Exports, ScriptContext, ScriptRegistry};
use zviewport::{Viewport, ViewportOptions};

const TITLE: &str = "zviewport";

/// Hover-able section volumes: a floor overlay and three rooms
fn demo_sections() -> Vec<Object3D> {
    let overlay = |name: &str, size: Vec3, position: Vec3, color: [f32; 3]| {
        Object3D::mesh(Mesh::new(Geometry::cuboid(name, size), Material::hidden_overlay(color)))
            .with_uuid(format!("section-{name}"))
            .with_position(position)
    };

    vec![
        overlay("floor", Vec3::new(12.0, 0.2, 8.0), Vec3::new(0.0, -0.1, 0.0), [0.9, 0.9, 0.9]),
        overlay("room1", Vec3::new(4.0, 3.0, 4.0), Vec3::new(-4.0, 1.5, -2.0), [0.2, 0.6, 1.0]),
        overlay("room2", Vec3::new(4.0, 3.0, 4.0), Vec3::new(0.0, 1.5, -2.0), [1.0, 0.6, 0.2]),
        overlay("room3", Vec3::new(4.0, 3.0, 4.0), Vec3::new(4.0, 1.5, -2.0), [0.4, 1.0, 0.4]),
    ]
}

/// Behaviors attached to the demo sections
fn demo_behaviors() -> ScriptRegistry {
    let mut registry = ScriptRegistry::new();

    registry.register("section-room1", |ctx: &mut ScriptContext<'_>| -> Result<Exports> {
        let texture = ctx.utils.abs_path("textures/room1.png");
        Ok(Exports::new()
            .parameters(json!({ "area": 16.0, "texture": texture }))
            .on("start", |scope, _| {
                if let Some(node) = scope.this_node() {
                    log::info!("Demo: '{}' ready with {:?}", node.name, node.parameters);
                }
                Ok(())
            }))
    });

    // Room 2 slowly bobs
    registry.register("section-room2", |_: &mut ScriptContext<'_>| -> Result<Exports> {
        let mut phase = 0.0_f32;
        Ok(Exports::new().on("update", move |scope, _| {
            phase += 0.02;
            if let Some(node) = scope.this_node_mut() {
                node.local_transform.position.y = 1.5 + phase.sin() * 0.1;
            }
            Ok(())
        }))
    });

    // Space toggles room 3
    registry.register("section-room3", |_: &mut ScriptContext<'_>| -> Result<Exports> {
        Ok(Exports::new().on("keydown", |scope, payload| {
            if let Some(InputEvent::KeyDown(key)) = payload.and_then(|p| p.as_input()) {
                if key.code == KeyCode::Space && !key.repeat {
                    if let Some(node) = scope.this_node_mut() {
                        node.visible = !node.visible;
                    }
                }
            }
            Ok(())
        }))
    });

    registry
}

struct App {
    config: ViewportConfig,
    window: Option<Arc<Window>>,
    viewport: Option<Viewport>,
    input: InputState,
    title: String,
}

impl App {
    fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            window: None,
            viewport: None,
            input: InputState::new(),
            title: TITLE.to_string(),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = WindowConfig::default().create(event_loop)?;
        let context = pollster::block_on(GpuContext::new(window.clone(), &self.config.renderer))?;
        let renderer = GpuRenderer::new(context, &self.config.renderer);

        let host = Host::new(
            WindowCanvas::new(window.clone()),
            WindowScheduler::new(window.clone()),
            LogNavigator,
        );
        let mut viewport = Viewport::new(
            host,
            renderer,
            self.config.clone(),
            ViewportOptions::with_objects(demo_sections()),
        );

        // Visible model under the overlays; not pickable
        viewport.scene_mut().add(Object3D::mesh(Mesh::new(
            Geometry::plane("ground", 40.0, 40.0),
            Material::new([0.35, 0.37, 0.4]),
        )).with_position(Vec3::new(0.0, -0.25, 0.0)));

        let project_path = std::env::current_dir()?.display().to_string();
        viewport.load_scripts(demo_behaviors(), &project_path)?;
        viewport.play_intro();

        self.window = Some(window);
        self.viewport = Some(viewport);
        Ok(())
    }

    /// Mirror the section label into the window title
    fn sync_title(&mut self) {
        let (Some(window), Some(viewport)) = (&self.window, &self.viewport) else {
            return;
        };
        let label = viewport.label();
        let title = if label.visible {
            format!("{TITLE} - {}", label.text)
        } else {
            TITLE.to_string()
        };
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewport.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("Failed to start viewport: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let input = self.input.translate(&event);
        let Some(viewport) = self.viewport.as_mut() else { return };

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(_) => viewport.on_window_resize(),
            WindowEvent::RedrawRequested => {
                if let Err(e) = viewport.frame() {
                    log::error!("Frame failed: {}", e);
                }
            }
            _ => {}
        }

        if let Some(input) = input {
            if let InputEvent::KeyDown(key) = input {
                if key.code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
            }
            if let Err(e) = viewport.handle_input(&input) {
                log::warn!("Input handling failed: {}", e);
            }
        }

        self.sync_title();
    }
}

fn parse_args(args: &[String]) -> Result<ViewportConfig> {
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
    };

    let mut config = match value_of("--config").map(PathBuf::from) {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            ViewportConfig::load(&path)?
        }
        None => ViewportConfig::default(),
    };

    if let Some(base_url) = value_of("--base-url") {
        config.base_url = Some(base_url.clone());
    }
    Ok(config)
}

fn main() {
    logging::init();
    log::info!("zviewport starting...");

    let args: Vec<String> = std::env::args().collect();
    let result = parse_args(&args).and_then(|config| {
        if let Some(base_url) = &config.base_url {
            log::info!("Click navigation to: {}", base_url);
        }
        let mut app = App::new(config);
        host::window::run(&mut app)
    });

    if let Err(e) = result {
        log::error!("{}", e);
        let code = match e {
            Error::Config(_) | Error::Io(_) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
