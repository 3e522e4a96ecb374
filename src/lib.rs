//! zviewport - an interactive 3D viewport over a small scene graph and renderer

pub mod core;
pub mod math;
pub mod scene;
pub mod animation;
pub mod events;
pub mod script;
pub mod host;
pub mod render;
pub mod viewport;

pub use viewport::{Objects, Viewport, ViewportOptions};
