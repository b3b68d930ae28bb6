//! Error types for the head gesture player.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `OpenCV` operation failed
    #[cfg(feature = "camera")]
    #[error("OpenCV error: {0}")]
    Camera(#[from] opencv::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pose source could not be opened or parsed
    #[error("Pose source error: {0}")]
    PoseSource(String),

    /// Audio device or decoding error
    #[error("Audio error: {0}")]
    Audio(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
