//! Error types for the name-draw engine

use thiserror::Error;

/// Draw engine error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Neither the priority pool nor the name pool has a candidate
    #[error("No names available to draw from")]
    EmptyPool,

    /// Pool or configuration mutation attempted while a spin is in flight
    #[error("A spin is in progress")]
    SpinInProgress,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DrawError {
    fn from(e: serde_json::Error) -> Self {
        DrawError::Serialization(e.to_string())
    }
}

/// Result type alias
pub type DrawResult<T> = Result<T, DrawError>;
