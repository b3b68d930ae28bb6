//! Command line arguments and how they override the configuration file.

use crate::{config::Config, constants::DEFAULT_CASCADE_PATH};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

/// Where head poses come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Synthetic movements on a timer, no camera needed
    Demo,
    /// Replay a pose script file
    Script,
    /// Webcam or video file with face detection (needs the `camera` feature)
    Camera,
}

/// Control music playback with head movements
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Directory containing music files (mp3, wav, ogg)
    #[arg(short, long)]
    pub music_dir: Option<PathBuf>,

    /// Pose source
    #[arg(short, long, value_enum, default_value = "demo")]
    pub source: SourceKind,

    /// Pose script to replay with `--source script`
    #[arg(long, required_if_eq("source", "script"))]
    pub script: Option<PathBuf>,

    /// Camera index with `--source camera` [default: 0]
    #[arg(long)]
    pub cam: Option<i32>,

    /// Video file to process instead of a camera, with `--source camera`
    #[arg(short, long, conflicts_with_all = ["script", "cam"])]
    pub video: Option<String>,

    /// Haar cascade model for `--source camera`
    /// [default: assets/haarcascade_frontalface_default.xml].
    /// Copy `haarcascade_frontalface_default.xml` from OpenCV's
    /// `share/opencv4/haarcascades/` directory.
    #[arg(long)]
    pub cascade: Option<PathBuf>,

    /// Ticks per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Process samples as fast as possible instead of at the tick rate
    #[arg(long)]
    pub no_realtime: bool,

    /// Yaw threshold in degrees
    #[arg(long)]
    pub yaw_threshold: Option<f64>,

    /// Pitch threshold in degrees
    #[arg(long)]
    pub pitch_threshold: Option<f64>,

    /// Pitch change in degrees that counts as a nod
    #[arg(long)]
    pub special_threshold: Option<f64>,

    /// Ticks between two gestures
    #[arg(long)]
    pub cooldown: Option<u32>,

    /// Pose smoothing (none, exponential, moving_average)
    #[arg(long)]
    pub smoothing: Option<String>,

    /// Run the pose source on its own thread
    #[arg(long)]
    pub threaded: bool,

    /// Read playback commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Show the pose with each status refresh
    #[arg(long)]
    pub show_pose: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Reject camera options given without `--source camera`
    ///
    /// # Errors
    ///
    /// Returns a clap argument conflict naming the ignored option
    pub fn check_source_options(&self) -> Result<(), clap::Error> {
        if self.source == SourceKind::Camera {
            return Ok(());
        }
        let ignored = [
            ("--cam", self.cam.is_some()),
            ("--video", self.video.is_some()),
            ("--cascade", self.cascade.is_some()),
        ];
        match ignored.iter().find(|(_, given)| *given) {
            Some((flag, _)) => Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                format!("{flag} is only used with `--source camera`"),
            )),
            None => Ok(()),
        }
    }

    /// Camera index, 0 unless `--cam` was given
    #[must_use]
    pub fn camera_index(&self) -> i32 {
        self.cam.unwrap_or(0)
    }

    /// Cascade model path, [`DEFAULT_CASCADE_PATH`] unless `--cascade` was given
    #[must_use]
    pub fn cascade_path(&self) -> PathBuf {
        self.cascade.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CASCADE_PATH))
    }

    /// Overlay command line values on `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.music_dir {
            config.playback.music_dir = dir.clone();
        }
        if let Some(fps) = self.fps {
            config.capture.target_fps = fps;
        }
        if let Some(value) = self.yaw_threshold {
            config.classifier.yaw_threshold = value;
        }
        if let Some(value) = self.pitch_threshold {
            config.classifier.pitch_threshold = value;
        }
        if let Some(value) = self.special_threshold {
            config.classifier.special_pitch_delta_threshold = value;
        }
        if let Some(value) = self.cooldown {
            config.classifier.cooldown_ticks = value;
        }
        if let Some(smoothing) = &self.smoothing {
            config.capture.smoothing = smoothing.clone();
        }
        if self.threaded {
            config.capture.threaded = true;
        }
        if self.show_pose {
            config.display.show_pose = true;
        }
    }
}
