//! Optional smoothing of head poses before classification.
//!
//! Smoothing runs between the pose source and the classifier and only sees
//! face-present samples. Raw samples flow through untouched with the default
//! `none` smoother.

use crate::{config::CaptureConfig, pose::Pose, Error, Result};
use std::collections::VecDeque;

/// Trait for all pose smoothers
pub trait PoseSmoother: Send {
    /// Smooth one pose
    fn apply(&mut self, pose: Pose) -> Pose;

    /// Forget all history
    fn reset(&mut self);

    /// Smoother name
    fn name(&self) -> &str;
}

/// Pass-through smoother
pub struct NoSmoothing;

impl PoseSmoother for NoSmoothing {
    fn apply(&mut self, pose: Pose) -> Pose {
        pose
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "none"
    }
}

/// Exponential smoothing: `out = alpha * in + (1 - alpha) * last`
pub struct ExponentialSmoother {
    alpha: f64,
    last: Option<Pose>,
}

impl ExponentialSmoother {
    /// Create an exponential smoother
    ///
    /// # Errors
    ///
    /// Returns an error unless `alpha` is in (0, 1]
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::InvalidInput(format!("Alpha must be in (0, 1], got {alpha}")));
        }
        Ok(Self { alpha, last: None })
    }
}

impl PoseSmoother for ExponentialSmoother {
    fn apply(&mut self, pose: Pose) -> Pose {
        let smoothed = match self.last {
            Some(last) => Pose::new(
                self.alpha * pose.yaw + (1.0 - self.alpha) * last.yaw,
                self.alpha * pose.pitch + (1.0 - self.alpha) * last.pitch,
            ),
            None => pose,
        };
        self.last = Some(smoothed);
        smoothed
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "exponential"
    }
}

/// Mean of the last `window` poses
pub struct MovingAverageSmoother {
    window: usize,
    history: VecDeque<Pose>,
}

impl MovingAverageSmoother {
    /// Create a moving average smoother
    ///
    /// # Errors
    ///
    /// Returns an error if `window` is zero
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::InvalidInput("Window size must be greater than 0".to_string()));
        }
        Ok(Self {
            window,
            history: VecDeque::with_capacity(window),
        })
    }
}

impl PoseSmoother for MovingAverageSmoother {
    #[allow(clippy::cast_precision_loss)] // window sizes are small
    fn apply(&mut self, pose: Pose) -> Pose {
        if self.history.len() >= self.window {
            self.history.pop_front();
        }
        self.history.push_back(pose);

        let n = self.history.len() as f64;
        let (yaw_sum, pitch_sum) = self
            .history
            .iter()
            .fold((0.0, 0.0), |(y, p), pose| (y + pose.yaw, p + pose.pitch));
        Pose::new(yaw_sum / n, pitch_sum / n)
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn name(&self) -> &str {
        "moving_average"
    }
}

/// Create a smoother by name using the capture settings
///
/// # Errors
///
/// Returns an error for unknown names or invalid parameters
pub fn create_smoother(name: &str, capture: &CaptureConfig) -> Result<Box<dyn PoseSmoother>> {
    match name.to_lowercase().as_str() {
        "none" => Ok(Box::new(NoSmoothing)),
        "exponential" => Ok(Box::new(ExponentialSmoother::new(capture.smoothing_alpha)?)),
        "moving_average" | "movingaverage" => Ok(Box::new(MovingAverageSmoother::new(capture.smoothing_window)?)),
        other => Err(Error::InvalidInput(format!("Unknown smoothing type: {other}"))),
    }
}
