//! Host collaborators: drawing surface, frame scheduling and navigation

pub mod label;
pub mod window;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub use label::{LabelStyle, SectionLabel};
pub use window::{WindowCanvas, WindowConfig, WindowScheduler};

/// Layout box of the drawing surface in client pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Box of the given size at the origin
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Client coordinates to `[0, 1]` box coordinates
    pub fn normalize(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        let width = if self.width > 0.0 { self.width } else { 1.0 };
        let height = if self.height > 0.0 { self.height } else { 1.0 };
        ((client_x - self.left) / width, (client_y - self.top) / height)
    }
}

/// Surface the viewport draws into
pub trait Canvas {
    /// Current layout box
    fn bounding_rect(&self) -> CanvasRect;

    /// Current size in whole pixels
    fn client_size(&self) -> (u32, u32) {
        let rect = self.bounding_rect();
        (rect.width.max(0.0) as u32, rect.height.max(0.0) as u32)
    }
}

/// The host's animation-frame primitive
pub trait FrameScheduler {
    /// False when the host cannot schedule frames at all
    fn is_available(&self) -> bool;

    /// Ask for one more frame
    fn request_frame(&self);
}

/// Page-level navigation
pub trait Navigator {
    fn navigate(&self, href: &str);
}

/// Collaborators handed to a viewport at construction
pub struct Host {
    pub canvas: Box<dyn Canvas>,
    pub scheduler: Box<dyn FrameScheduler>,
    pub navigator: Box<dyn Navigator>,
}

impl Host {
    pub fn new(
        canvas: impl Canvas + 'static,
        scheduler: impl FrameScheduler + 'static,
        navigator: impl Navigator + 'static,
    ) -> Self {
        Self {
            canvas: Box::new(canvas),
            scheduler: Box::new(scheduler),
            navigator: Box::new(navigator),
        }
    }
}

/// Navigator that only logs the target
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, href: &str) {
        log::info!("Navigate: {}", href);
    }
}

/// Canvas whose box is set by the caller; clones share the same box
#[derive(Clone, Debug, Default)]
pub struct SharedCanvas {
    rect: Rc<Cell<CanvasRect>>,
}

impl SharedCanvas {
    pub fn new(rect: CanvasRect) -> Self {
        Self { rect: Rc::new(Cell::new(rect)) }
    }

    pub fn set_rect(&self, rect: CanvasRect) {
        self.rect.set(rect);
    }

    pub fn set_size(&self, width: f32, height: f32) {
        let mut rect = self.rect.get();
        rect.width = width;
        rect.height = height;
        self.rect.set(rect);
    }
}

impl Canvas for SharedCanvas {
    fn bounding_rect(&self) -> CanvasRect {
        self.rect.get()
    }
}

/// Scheduler driven by the caller; counts frame requests
#[derive(Clone, Debug)]
pub struct ManualScheduler {
    available: bool,
    requests: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self { available: true, requests: Rc::new(Cell::new(0)) }
    }

    /// A host without an animation-frame primitive
    pub fn unavailable() -> Self {
        Self { available: false, ..Self::new() }
    }

    pub fn requests(&self) -> u64 {
        self.requests.get()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualScheduler {
    fn is_available(&self) -> bool {
        self.available
    }

    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// Navigator that records targets; clones share the record
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator {
    visited: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, href: &str) {
        self.visited.borrow_mut().push(href.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_against_offset_box() {
        let rect = CanvasRect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(rect.normalize(110.0, 70.0), (0.5, 0.5));
        assert_eq!(rect.normalize(10.0, 20.0), (0.0, 0.0));
    }

    #[test]
    fn test_normalize_empty_box_does_not_divide_by_zero() {
        let (x, y) = CanvasRect::default().normalize(3.0, 4.0);
        assert_eq!((x, y), (3.0, 4.0));
    }

    #[test]
    fn test_shared_canvas_clones_see_updates() {
        let canvas = SharedCanvas::new(CanvasRect::sized(640.0, 480.0));
        let view = canvas.clone();
        canvas.set_size(800.5, 600.0);
        assert_eq!(view.client_size(), (800, 600));
    }

    #[test]
    fn test_manual_scheduler_counts_requests() {
        let scheduler = ManualScheduler::new();
        let handle = scheduler.clone();
        scheduler.request_frame();
        scheduler.request_frame();
        assert_eq!(handle.requests(), 2);
        assert!(!ManualScheduler::unavailable().is_available());
    }

    #[test]
    fn test_recording_navigator() {
        let navigator = RecordingNavigator::new();
        let handle = navigator.clone();
        navigator.navigate("https://x/room1");
        assert_eq!(handle.visited(), vec!["https://x/room1".to_string()]);
    }
}
