//! Playback controller driven by gestures and UI commands.
//!
//! Every failure inside the controller (unreadable directory, undecodable
//! file, missing device) is logged and swallowed: gesture dispatch runs on
//! the capture loop and must never be interrupted by playback problems.

use super::{
    audio::AudioBackend,
    library::{track_name, TrackLibrary},
};
use crate::{
    constants::{MAX_LOG_MESSAGES, NO_TRACKS_NAME},
    gesture::Gesture,
};
use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

/// Transport status reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// A track is playing
    Playing,
    /// A track is loaded but paused
    Paused,
    /// Nothing has been started, or there is nothing to play
    Stopped,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Stopped => "stopped",
        })
    }
}

/// Snapshot of the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    /// File name, or a placeholder when the library is empty
    pub name: String,
    /// Transport status
    pub status: PlaybackStatus,
    /// 1-based position in the library, 0 when empty
    pub index: usize,
    /// Number of tracks in the library
    pub total: usize,
}

impl fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({}/{})", self.name, self.status, self.index, self.total)
    }
}

/// Track list, transport state and a bounded log of what happened
pub struct PlaybackController {
    library: TrackLibrary,
    backend: Box<dyn AudioBackend>,
    current: usize,
    status: PlaybackStatus,
    volume: f32,
    logs: VecDeque<String>,
    log_capacity: usize,
    total_logged: u64,
    rng: StdRng,
    released: bool,
}

impl PlaybackController {
    /// Create a controller over `music_dir`, creating the directory if needed
    pub fn new<P: Into<PathBuf>>(music_dir: P, backend: Box<dyn AudioBackend>, volume: f32) -> Self {
        let mut controller = Self {
            library: TrackLibrary::new(music_dir),
            backend,
            current: 0,
            status: PlaybackStatus::Stopped,
            volume: volume.clamp(0.0, 1.0),
            logs: VecDeque::with_capacity(MAX_LOG_MESSAGES),
            log_capacity: MAX_LOG_MESSAGES,
            total_logged: 0,
            rng: StdRng::from_entropy(),
            released: false,
        };
        info!("Playback controller using {} audio backend", controller.backend.name());

        match controller.library.ensure_dir() {
            Ok(true) => controller.add_log("Created music directory".to_string()),
            Ok(false) => {}
            Err(e) => controller.add_warning(format!("Cannot create music directory: {e}")),
        }
        controller.scan_tracks();
        controller
    }

    /// Keep at most `capacity` log lines
    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity.max(1);
        while self.logs.len() > self.log_capacity {
            self.logs.pop_front();
        }
        self
    }

    /// Use a fixed seed for shuffling
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Act on a classified gesture; `Gesture::None` is ignored
    pub fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Left => self.previous(),
            Gesture::Right => self.next(),
            Gesture::Up | Gesture::Down => self.toggle_play_pause(),
            Gesture::Special => self.shuffle(),
            Gesture::None => {}
        }
    }

    /// Start or resume the current track
    pub fn play(&mut self) {
        let Some(path) = self.library.get(self.current).map(PathBuf::from) else {
            self.add_log("No tracks available to play".to_string());
            return;
        };
        if self.status == PlaybackStatus::Playing {
            return;
        }

        if self.status == PlaybackStatus::Paused && self.backend.is_busy() {
            self.backend.resume();
        } else if let Err(e) = self.backend.load_and_play(&path, self.volume) {
            self.status = PlaybackStatus::Stopped;
            self.add_warning(format!("Error playing music: {e}"));
            return;
        }

        self.status = PlaybackStatus::Playing;
        self.add_log(format!("Playing: {}", track_name(&path)));
    }

    /// Pause if playing
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.backend.pause();
            self.status = PlaybackStatus::Paused;
            self.add_log("Paused playback".to_string());
        }
    }

    /// Toggle between playing and paused
    pub fn toggle_play_pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Skip to the next track, wrapping to the first
    pub fn next(&mut self) {
        let total = self.library.len();
        if total == 0 {
            self.add_log("No tracks available".to_string());
            return;
        }
        self.current = (self.current + 1) % total;
        self.switch_to("Next track");
    }

    /// Go back to the previous track, wrapping to the last
    pub fn previous(&mut self) {
        let total = self.library.len();
        if total == 0 {
            self.add_log("No tracks available".to_string());
            return;
        }
        self.current = (self.current + total - 1) % total;
        self.switch_to("Previous track");
    }

    /// Jump to a random track
    pub fn shuffle(&mut self) {
        let total = self.library.len();
        if total == 0 {
            self.add_log("No tracks available".to_string());
            return;
        }
        self.current = self.rng.gen_range(0..total);
        self.switch_to("Shuffled to");
    }

    /// Set the volume, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            self.add_warning(format!("Ignoring invalid volume {volume}"));
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
        self.add_log(format!("Volume set to {}%", (self.volume * 100.0).round()));
    }

    /// Current volume in [0, 1]
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Rescan the music directory
    pub fn reload_tracks(&mut self) {
        match self.library.reload() {
            Ok(count) => self.add_log(format!("Reloaded tracks: found {count} music files")),
            Err(e) => self.add_warning(format!("Error loading tracks: {e}")),
        }
        if self.current >= self.library.len() {
            self.current = 0;
        }
    }

    /// Switch to another music directory; playback stops
    pub fn set_music_dir<P: Into<PathBuf>>(&mut self, dir: P) {
        let dir = dir.into();
        match self.library.set_dir(&dir) {
            Ok(count) => {
                self.backend.stop();
                self.status = PlaybackStatus::Stopped;
                self.current = 0;
                self.add_log(format!("Music folder set to: {}", dir.display()));
                self.add_log(format!("Reloaded tracks: found {count} music files"));
            }
            Err(e) => self.add_warning(format!("Cannot use music folder {}: {e}", dir.display())),
        }
    }

    /// Snapshot of the current track
    #[must_use]
    pub fn current_track_info(&self) -> TrackInfo {
        match self.library.get(self.current) {
            Some(path) => TrackInfo {
                name: track_name(path),
                status: self.status,
                index: self.current + 1,
                total: self.library.len(),
            },
            None => TrackInfo {
                name: NO_TRACKS_NAME.to_string(),
                status: PlaybackStatus::Stopped,
                index: 0,
                total: 0,
            },
        }
    }

    /// Log lines, oldest first
    #[must_use]
    pub fn recent_logs(&self) -> Vec<String> {
        self.logs.iter().cloned().collect()
    }

    /// Number of log lines ever recorded, including ones already evicted
    #[must_use]
    pub const fn total_logged(&self) -> u64 {
        self.total_logged
    }

    /// Number of tracks in the library
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.library.len()
    }

    /// Stop playback and release the audio device; later calls do nothing
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.backend.shutdown();
        self.status = PlaybackStatus::Stopped;
        info!("Playback controller shut down");
    }

    /// Record a message in the log ring; the application log gets it at debug level
    pub fn add_log(&mut self, message: String) {
        debug!("{}", message);
        self.push_log(message);
    }

    fn add_warning(&mut self, message: String) {
        warn!("{}", message);
        self.push_log(message);
    }

    fn push_log(&mut self, message: String) {
        self.total_logged += 1;
        self.logs.push_back(message);
        while self.logs.len() > self.log_capacity {
            self.logs.pop_front();
        }
    }

    fn scan_tracks(&mut self) {
        if let Err(e) = self.library.reload() {
            self.add_warning(format!("Error loading tracks: {e}"));
        }
        if self.library.is_empty() {
            self.add_log("No music tracks found. Please add MP3, WAV or OGG files to the music directory.".to_string());
        } else {
            let count = self.library.len();
            self.add_log(format!("Found {count} music files"));
        }
    }

    fn switch_to(&mut self, action: &str) {
        let name = self.library.get(self.current).map(track_name).unwrap_or_default();
        self.add_log(format!("{action}: {name}"));
        self.backend.stop();
        self.status = PlaybackStatus::Stopped;
        self.play();
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
