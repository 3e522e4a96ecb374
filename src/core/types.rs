//! Core type aliases and re-exports

pub use glam::{
    Vec2, Vec3, Vec4,
    Mat3, Mat4,
    Quat,
};

/// Standard Result type for the viewport
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
