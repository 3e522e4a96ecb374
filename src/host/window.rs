//! Native window host backed by winit

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::core::error::Error;

use super::{Canvas, CanvasRect, FrameScheduler};

/// Window configuration
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "zviewport".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl WindowConfig {
    /// Create the window on a running event loop
    pub fn create(&self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>, Error> {
        let attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.width, self.height));

        event_loop
            .create_window(attributes)
            .map(Arc::new)
            .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))
    }
}

/// Canvas covering the window's client area, in physical pixels
pub struct WindowCanvas {
    window: Arc<Window>,
}

impl WindowCanvas {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl Canvas for WindowCanvas {
    fn bounding_rect(&self) -> CanvasRect {
        let size = self.window.inner_size();
        CanvasRect::sized(size.width as f32, size.height as f32)
    }
}

/// Frame scheduling through redraw requests
pub struct WindowScheduler {
    window: Arc<Window>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl FrameScheduler for WindowScheduler {
    fn is_available(&self) -> bool {
        true
    }

    fn request_frame(&self) {
        self.window.request_redraw();
    }
}

/// Create an event loop and run `app` on it until it exits
pub fn run<A: ApplicationHandler>(app: &mut A) -> Result<(), Error> {
    let event_loop = EventLoop::new()
        .map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;

    // Frames are driven by redraw requests
    event_loop.set_control_flow(ControlFlow::Wait);

    event_loop
        .run_app(app)
        .map_err(|e| Error::Window(format!("Event loop error: {}", e)))?;

    Ok(())
}
