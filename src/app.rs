//! Main application module: the tick loop tying pose input to playback.

use crate::{
    capture::{spawn_capture, SampleReceiver, Ticker},
    classifier::{GestureClassifier, Thresholds},
    config::{CaptureConfig, Config},
    error::Result,
    gesture::Gesture,
    playback::PlaybackController,
    pose::{PoseSample, PoseSource},
    presentation::{apply_command, Command, StatusDisplay},
    smoothing::{create_smoother, PoseSmoother},
};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::Write;
use std::thread::JoinHandle;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Classification thresholds
    pub thresholds: Thresholds,
    /// Capture cadence and smoothing
    pub capture: CaptureConfig,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    /// Sleep between ticks to hold the target rate
    pub realtime: bool,
    /// Ticks between status refreshes
    pub refresh_ticks: u64,
    /// Print the pose with each refresh
    pub show_pose: bool,
}

impl AppConfig {
    /// Build application settings from a loaded configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            thresholds: config.classifier,
            capture: config.capture.clone(),
            max_ticks: None,
            realtime: true,
            refresh_ticks: config.display.refresh_ticks,
            show_pose: config.display.show_pose,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Counters collected over a run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Ticks processed
    pub ticks: u64,
    /// Ticks without a face
    pub faceless_ticks: u64,
    /// Waits on the capture thread that timed out without a sample
    pub late_waits: u64,
    gestures: HashMap<Gesture, u64>,
}

impl RunStats {
    /// How often `gesture` was emitted
    #[must_use]
    pub fn count(&self, gesture: Gesture) -> u64 {
        self.gestures.get(&gesture).copied().unwrap_or(0)
    }

    /// Total gestures emitted
    #[must_use]
    pub fn total_gestures(&self) -> u64 {
        self.gestures.values().sum()
    }
}

/// Result of waiting for the next tick's sample
enum Poll {
    Sample(PoseSample),
    Late,
    Ended,
}

enum Input {
    Direct(Box<dyn PoseSource>),
    Threaded {
        rx: SampleReceiver,
        handle: JoinHandle<u64>,
    },
    Closed,
}

/// Main application struct
pub struct GestureApp {
    config: AppConfig,
    input: Input,
    smoother: Box<dyn PoseSmoother>,
    classifier: GestureClassifier,
    controller: PlaybackController,
    display: Option<StatusDisplay<Box<dyn Write>>>,
    commands: Option<Receiver<Command>>,
    stats: RunStats,
}

impl GestureApp {
    /// Create the application around a pose source and playback controller
    ///
    /// # Errors
    ///
    /// Returns an error if the configured smoothing is invalid
    pub fn new(config: AppConfig, source: Box<dyn PoseSource>, controller: PlaybackController) -> Result<Self> {
        info!("Initializing gesture application with {} pose source", source.name());

        let smoother = create_smoother(&config.capture.smoothing, &config.capture)?;
        if smoother.name() != "none" {
            info!("Pose smoothing: {}", smoother.name());
        }

        let input = if config.capture.threaded {
            let (handle, rx) = spawn_capture(source, config.capture.target_fps);
            Input::Threaded { rx, handle }
        } else {
            Input::Direct(source)
        };

        Ok(Self {
            classifier: GestureClassifier::new(config.thresholds),
            config,
            input,
            smoother,
            controller,
            display: None,
            commands: None,
            stats: RunStats::default(),
        })
    }

    /// Render status to `out` on the configured cadence
    #[must_use]
    pub fn with_display(mut self, out: Box<dyn Write>) -> Self {
        self.display = Some(StatusDisplay::new(out, self.config.refresh_ticks, self.config.show_pose));
        self
    }

    /// Accept user commands from `commands`
    #[must_use]
    pub fn with_commands(mut self, commands: Receiver<Command>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Process one tick's sample: smooth, classify, dispatch
    pub fn step(&mut self, sample: PoseSample) -> Gesture {
        let sample = if sample.face_present {
            sample.with_pose(self.smoother.apply(sample.pose()))
        } else {
            self.stats.faceless_ticks += 1;
            sample
        };

        let gesture = self.classifier.classify(sample);
        self.stats.ticks += 1;

        if !gesture.is_none() {
            debug!(
                "Tick {}: {} at yaw {:.1} pitch {:.1}",
                self.stats.ticks, gesture, sample.yaw, sample.pitch
            );
            *self.stats.gestures.entry(gesture).or_insert(0) += 1;
            self.controller.add_log(format!("Detected movement: {gesture}"));
            self.controller.handle_gesture(gesture);
        }

        gesture
    }

    /// Run the tick loop until the source ends, the tick limit is hit or the
    /// user quits. The playback controller is shut down on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the status display fails
    pub fn run(&mut self) -> Result<RunStats> {
        let result = self.run_loop();
        self.finish();
        result.map(|()| self.stats.clone())
    }

    fn run_loop(&mut self) -> Result<()> {
        info!("Starting gesture loop at {} fps", self.config.capture.target_fps);
        let mut ticker = Ticker::new(self.config.capture.target_fps);

        loop {
            if let Some(max) = self.config.max_ticks {
                if self.stats.ticks >= max {
                    info!("Tick limit of {} reached", max);
                    break;
                }
            }

            let sample = match self.next_sample(&ticker) {
                Poll::Sample(sample) => sample,
                Poll::Late => {
                    // No frame behind this wait, so it is not a tick
                    self.stats.late_waits += 1;
                    if !self.drain_commands() {
                        info!("Exit requested by user");
                        break;
                    }
                    continue;
                }
                Poll::Ended => {
                    info!("Pose source exhausted");
                    break;
                }
            };

            self.step(sample);

            if !self.drain_commands() {
                info!("Exit requested by user");
                break;
            }

            if let Some(display) = &mut self.display {
                display.tick(self.stats.ticks, &self.controller, Some(sample))?;
            }

            if self.config.realtime && matches!(self.input, Input::Direct(_)) {
                ticker.wait();
            }
        }

        if let Some(display) = &mut self.display {
            display.render(&self.controller, None)?;
        }
        Ok(())
    }

    fn next_sample(&mut self, ticker: &Ticker) -> Poll {
        match &mut self.input {
            Input::Direct(source) => source.next_sample().map_or(Poll::Ended, Poll::Sample),
            Input::Threaded { rx, .. } => match rx.recv_timeout(ticker.period() * 2) {
                Ok(sample) => Poll::Sample(sample),
                Err(RecvTimeoutError::Timeout) => {
                    debug!("Capture thread late, waiting again");
                    Poll::Late
                }
                Err(RecvTimeoutError::Disconnected) => Poll::Ended,
            },
            Input::Closed => Poll::Ended,
        }
    }

    /// Apply pending user commands; false once the user asked to quit
    fn drain_commands(&mut self) -> bool {
        let Some(commands) = &self.commands else {
            return true;
        };
        while let Ok(command) = commands.try_recv() {
            debug!("User command: {:?}", command);
            if !apply_command(&mut self.controller, command) {
                return false;
            }
        }
        true
    }

    fn finish(&mut self) {
        self.controller.shutdown();
        if let Input::Threaded { rx, handle } = std::mem::replace(&mut self.input, Input::Closed) {
            // The capture thread stops at its next publish once the receiver is gone
            drop(rx);
            match handle.join() {
                Ok(dropped) => info!("Capture thread joined, {} samples superseded", dropped),
                Err(_) => warn!("Capture thread panicked"),
            }
        }
        info!(
            "Processed {} ticks, {} gestures",
            self.stats.ticks,
            self.stats.total_gestures()
        );
    }

    /// Playback controller
    #[must_use]
    pub const fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Gesture classifier
    #[must_use]
    pub const fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Counters so far
    #[must_use]
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }
}
