//! Audio output backends for the playback controller.
//!
//! The controller only needs a handful of transport operations. The silent
//! [`NullBackend`] keeps the player usable without a sound device and backs
//! the tests; the `audio` feature adds a `rodio` backend.

use crate::Result;
use std::path::{Path, PathBuf};

/// Transport operations the playback controller drives
pub trait AudioBackend {
    /// Stop whatever is playing, then load `path` and start it at `volume`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded
    fn load_and_play(&mut self, path: &Path, volume: f32) -> Result<()>;

    /// Pause the current track
    fn pause(&mut self);

    /// Resume a paused track
    fn resume(&mut self);

    /// Stop and unload the current track
    fn stop(&mut self);

    /// Change output volume in [0, 1]
    fn set_volume(&mut self, volume: f32);

    /// Whether a track is loaded and not finished (playing or paused)
    fn is_busy(&self) -> bool;

    /// Release the output device
    fn shutdown(&mut self);

    /// Backend name
    fn name(&self) -> &str;
}

/// Transport state as seen by [`NullBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullState {
    /// Nothing loaded
    #[default]
    Idle,
    /// Loaded and running
    Playing,
    /// Loaded and paused
    Paused,
}

/// Silent backend that only tracks transport state
#[derive(Debug, Default)]
pub struct NullBackend {
    state: NullState,
    current: Option<PathBuf>,
    volume: f32,
    shutdowns: u32,
}

impl NullBackend {
    /// Create a silent backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current transport state
    #[must_use]
    pub const fn state(&self) -> NullState {
        self.state
    }

    /// Track loaded by the last `load_and_play`
    #[must_use]
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Last volume set
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// How many times `shutdown` was called
    #[must_use]
    pub const fn shutdowns(&self) -> u32 {
        self.shutdowns
    }
}

impl AudioBackend for NullBackend {
    fn load_and_play(&mut self, path: &Path, volume: f32) -> Result<()> {
        self.current = Some(path.to_path_buf());
        self.volume = volume;
        self.state = NullState::Playing;
        Ok(())
    }

    fn pause(&mut self) {
        if self.state == NullState::Playing {
            self.state = NullState::Paused;
        }
    }

    fn resume(&mut self) {
        if self.state == NullState::Paused {
            self.state = NullState::Playing;
        }
    }

    fn stop(&mut self) {
        self.state = NullState::Idle;
        self.current = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn is_busy(&self) -> bool {
        self.state != NullState::Idle
    }

    fn shutdown(&mut self) {
        self.stop();
        self.shutdowns += 1;
    }

    fn name(&self) -> &str {
        "null"
    }
}

#[cfg(feature = "audio")]
pub use rodio_backend::RodioBackend;

#[cfg(feature = "audio")]
mod rodio_backend {
    use super::AudioBackend;
    use crate::{Error, Result};
    use log::info;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    /// Backend playing through the default output device
    pub struct RodioBackend {
        // Dropping the stream closes the device, so it lives in an Option
        stream: Option<(OutputStream, OutputStreamHandle)>,
        sink: Option<Sink>,
    }

    impl RodioBackend {
        /// Open the default output device
        ///
        /// # Errors
        ///
        /// Returns an error if no output device is available
        pub fn open() -> Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| Error::Audio(format!("Failed to open output device: {e}")))?;
            info!("Audio output device opened");
            Ok(Self {
                stream: Some((stream, handle)),
                sink: None,
            })
        }
    }

    impl AudioBackend for RodioBackend {
        fn load_and_play(&mut self, path: &Path, volume: f32) -> Result<()> {
            self.stop();
            let (_, handle) = self
                .stream
                .as_ref()
                .ok_or_else(|| Error::Audio("Output device already released".to_string()))?;

            let file = File::open(path)?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| Error::Audio(format!("Cannot decode {}: {e}", path.display())))?;
            let sink = Sink::try_new(handle).map_err(|e| Error::Audio(format!("Failed to create sink: {e}")))?;
            sink.set_volume(volume);
            sink.append(source);
            sink.play();
            self.sink = Some(sink);
            Ok(())
        }

        fn pause(&mut self) {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
        }

        fn resume(&mut self) {
            if let Some(sink) = &self.sink {
                sink.play();
            }
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }

        fn set_volume(&mut self, volume: f32) {
            if let Some(sink) = &self.sink {
                sink.set_volume(volume);
            }
        }

        fn is_busy(&self) -> bool {
            self.sink.as_ref().map(|sink| !sink.empty()).unwrap_or(false)
        }

        fn shutdown(&mut self) {
            self.stop();
            if self.stream.take().is_some() {
                info!("Audio output device released");
            }
        }

        fn name(&self) -> &str {
            "rodio"
        }
    }
}
