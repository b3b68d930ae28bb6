//! Configuration management for the head gesture player

use crate::{
    classifier::Thresholds,
    constants::{DEFAULT_FPS, DEFAULT_REFRESH_TICKS, DEFAULT_VOLUME, MAX_LOG_MESSAGES},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gesture classification thresholds
    pub classifier: Thresholds,

    /// Capture loop configuration
    pub capture: CaptureConfig,

    /// Playback configuration
    pub playback: PlaybackConfig,

    /// Status display configuration
    pub display: DisplayConfig,
}

/// Capture loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Ticks per second
    pub target_fps: u32,

    /// Pose smoothing applied before classification
    pub smoothing: String,

    /// Moving average window size
    pub smoothing_window: usize,

    /// Exponential smoothing alpha
    pub smoothing_alpha: f64,

    /// Run the pose source on its own thread.
    ///
    /// Cooldown counts captured samples: waits in which the capture thread
    /// delivers nothing are skipped rather than classified.
    pub threaded: bool,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Directory scanned for tracks
    pub music_dir: PathBuf,

    /// Initial volume (0.0-1.0)
    pub volume: f32,

    /// Number of log lines kept for display
    pub log_capacity: usize,
}

/// Status display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Ticks between two status refreshes
    pub refresh_ticks: u64,

    /// Print the latest pose with each refresh
    pub show_pose: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,
            smoothing: "none".to_string(),
            smoothing_window: 5,
            smoothing_alpha: 0.5,
            threaded: false,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("music"),
            volume: DEFAULT_VOLUME,
            log_capacity: MAX_LOG_MESSAGES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ticks: DEFAULT_REFRESH_TICKS,
            show_pose: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("Yaw threshold", self.classifier.yaw_threshold),
            ("Pitch threshold", self.classifier.pitch_threshold),
            ("Special pitch delta threshold", self.classifier.special_pitch_delta_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a finite, non-negative number of degrees"
                )));
            }
        }

        if self.capture.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }
        if self.capture.smoothing_window == 0 {
            return Err(Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        if !(self.capture.smoothing_alpha > 0.0 && self.capture.smoothing_alpha <= 1.0) {
            return Err(Error::ConfigError(
                "Smoothing alpha must be in (0.0, 1.0]".to_string(),
            ));
        }
        if !["none", "exponential", "moving_average"].contains(&self.capture.smoothing.as_str()) {
            return Err(Error::ConfigError(format!(
                "Unknown smoothing type: {}",
                self.capture.smoothing
            )));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(Error::ConfigError("Volume must be between 0.0 and 1.0".to_string()));
        }
        if self.playback.log_capacity == 0 {
            return Err(Error::ConfigError("Log capacity must be greater than 0".to_string()));
        }

        if self.display.refresh_ticks == 0 {
            return Err(Error::ConfigError("Refresh ticks must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Gesture Player Configuration

# Gesture classification (degrees / ticks)
classifier:
  yaw_threshold: 15.0
  pitch_threshold: 15.0
  special_pitch_delta_threshold: 30.0
  cooldown_ticks: 30

# Capture loop
capture:
  target_fps: 30
  smoothing: "none"        # none, exponential, moving_average
  smoothing_window: 5
  smoothing_alpha: 0.5
  threaded: false

# Playback
playback:
  music_dir: "music"
  volume: 0.5
  log_capacity: 100

# Status display
display:
  refresh_ticks: 15
  show_pose: false
"#;
