//! Head gesture music player library.
//!
//! Head movements seen by a camera drive music playback. Each capture tick
//! produces one [`pose::PoseSample`] (face present, yaw, pitch), the
//! [`classifier`] turns the sample stream into debounced
//! [`gesture::Gesture`]s, and the [`playback`] controller maps those to
//! previous / next / play-pause / shuffle.
//!
//! The pipeline consists of:
//! 1. A pose source: camera with face detection, a replayed script, or the demo double
//! 2. Optional smoothing of the pose
//! 3. Gesture classification with thresholds and a cooldown
//! 4. Playback commands and a bounded log for display
//!
//! # Examples
//!
//! ## Classifying samples
//!
//! ```
//! use head_gesture_player::{
//!     classifier::{GestureClassifier, Thresholds},
//!     gesture::Gesture,
//!     pose::PoseSample,
//! };
//!
//! let mut classifier = GestureClassifier::new(Thresholds::default());
//!
//! assert_eq!(classifier.classify(PoseSample::face(20.0, 0.0)), Gesture::Right);
//! // Cooling down: nothing fires even though the head is still turned
//! assert_eq!(classifier.classify(PoseSample::face(20.0, 0.0)), Gesture::None);
//! // Losing the face never fires
//! assert_eq!(classifier.classify(PoseSample::no_face()), Gesture::None);
//! ```
//!
//! ## Driving playback
//!
//! ```no_run
//! use head_gesture_player::{
//!     app::{AppConfig, GestureApp},
//!     playback::{NullBackend, PlaybackController},
//!     pose::DemoPoseSource,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = PlaybackController::new("music", Box::new(NullBackend::new()), 0.5);
//! let mut config = AppConfig::default();
//! config.max_ticks = Some(600);
//!
//! let mut app = GestureApp::new(config, Box::new(DemoPoseSource::default()), controller)?
//!     .with_display(Box::new(std::io::stdout()));
//! let stats = app.run()?;
//! println!("{} gestures in {} ticks", stats.total_gestures(), stats.ticks);
//! # Ok(())
//! # }
//! ```

/// Gesture classification from pose samples
pub mod classifier;

/// Discrete gesture values
pub mod gesture;

/// Pose samples and pose sources
pub mod pose;

/// Optional pose smoothing before classification
pub mod smoothing;

/// Fixed-rate ticking and the latest-wins capture channel
pub mod capture;

/// Track library, audio output and playback controller
pub mod playback;

/// Terminal status display and user commands
pub mod presentation;

/// Webcam pose source using `OpenCV`
#[cfg(feature = "camera")]
pub mod camera;

/// Main application module
pub mod app;

/// Command line arguments
pub mod cli;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
