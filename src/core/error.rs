//! Error types for the viewport

use thiserror::Error;

/// Main error type for the viewport
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("No scene object with uuid {0}")]
    ObjectNotFound(String),

    #[error("Geometry '{0}' has no bounding box")]
    MissingBoundingBox(String),

    #[error("Script error: {0}")]
    Script(String),
}
