//! Music playback: track discovery, audio output and the gesture-driven controller.

/// Audio output backends
pub mod audio;

/// Gesture and command driven playback controller
pub mod controller;

/// Music directory scanning
pub mod library;

pub use audio::{AudioBackend, NullBackend};
pub use controller::{PlaybackController, PlaybackStatus, TrackInfo};
pub use library::TrackLibrary;
