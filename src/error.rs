//! Error types for sketch setup and per-frame callbacks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// Host page has no element with this id; only the affected sketch is disabled
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Simulation state left the finite range (NaN or infinity)
    #[error("non-finite simulation state in {0}")]
    NonFinite(&'static str),

    #[error("render error: {0}")]
    Render(String),

    #[error("panic in frame callback: {0}")]
    Panicked(String),
}

impl From<serde_json::Error> for SketchError {
    fn from(err: serde_json::Error) -> Self {
        SketchError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SketchError>;
