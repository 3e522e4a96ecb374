//! Renderer seam and its wgpu and headless implementations

pub mod context;
pub mod gpu_renderer;
pub mod mesh_pipeline;
pub mod renderer;

pub use context::GpuContext;
pub use gpu_renderer::GpuRenderer;
pub use renderer::{DrawRecord, HeadlessRenderer, RenderedFrame, Renderer};
