//! Error types for the kernel facade.

use shapekit_frames::FramesError;
use shapekit_shapes::ShapeError;
use thiserror::Error;

/// Errors from settings handling and settings-driven construction.
#[derive(Error, Debug)]
pub enum KernelError {
    /// A settings value is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings text could not be parsed.
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be serialized.
    #[error("settings serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Shape construction failed.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Frame sampling failed.
    #[error(transparent)]
    Frames(#[from] FramesError),

    /// The single-threaded construction pool could not be started.
    #[cfg(feature = "parallel")]
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, KernelError>;
