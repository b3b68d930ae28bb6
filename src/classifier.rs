//! Gesture classification from per-tick head pose samples.
//!
//! The classifier turns a stream of [`PoseSample`]s into a debounced stream
//! of [`Gesture`]s. It keeps two pieces of state: the last accepted pose,
//! used for the rapid-nod check, and a cooldown counter that enforces a
//! minimum number of ticks between two emitted gestures.
//!
//! The state is an explicit [`ClassifierState`] value. Callers that want to
//! own it themselves use [`classify`]; [`GestureClassifier`] bundles it with
//! its [`Thresholds`].

use crate::{
    constants::{
        DEFAULT_COOLDOWN_TICKS, DEFAULT_PITCH_THRESHOLD, DEFAULT_SPECIAL_PITCH_DELTA_THRESHOLD,
        DEFAULT_YAW_THRESHOLD,
    },
    gesture::Gesture,
    pose::{Pose, PoseSample},
};
use serde::{Deserialize, Serialize};

/// Classification thresholds, fixed at construction time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Yaw magnitude (degrees) above which left/right fires
    pub yaw_threshold: f64,

    /// Pitch magnitude (degrees) above which up/down fires
    pub pitch_threshold: f64,

    /// Pitch change between two accepted poses (degrees) above which special fires
    pub special_pitch_delta_threshold: f64,

    /// Ticks to wait after a gesture before another may fire
    pub cooldown_ticks: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            yaw_threshold: DEFAULT_YAW_THRESHOLD,
            pitch_threshold: DEFAULT_PITCH_THRESHOLD,
            special_pitch_delta_threshold: DEFAULT_SPECIAL_PITCH_DELTA_THRESHOLD,
            cooldown_ticks: DEFAULT_COOLDOWN_TICKS,
        }
    }
}

/// Mutable classifier state, advanced once per tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassifierState {
    /// Last accepted pose; frozen while no face is present
    pub previous_pose: Pose,

    /// Ticks until another gesture may be emitted
    pub cooldown_remaining: u32,
}

/// Advance `state` by one tick and classify `sample`.
///
/// Yaw is checked before pitch, and pitch magnitude before the pitch delta,
/// all against the current sample. While cooling down the pose is still
/// tracked but nothing fires. A no-face tick only decrements the cooldown.
pub fn classify(state: &mut ClassifierState, thresholds: &Thresholds, sample: PoseSample) -> Gesture {
    state.cooldown_remaining = state.cooldown_remaining.saturating_sub(1);

    if !sample.face_present {
        return Gesture::None;
    }

    let gesture = if state.cooldown_remaining > 0 {
        Gesture::None
    } else if sample.yaw.abs() > thresholds.yaw_threshold {
        if sample.yaw > 0.0 {
            Gesture::Right
        } else {
            Gesture::Left
        }
    } else if sample.pitch.abs() > thresholds.pitch_threshold {
        if sample.pitch > 0.0 {
            Gesture::Down
        } else {
            Gesture::Up
        }
    } else if (sample.pitch - state.previous_pose.pitch).abs() > thresholds.special_pitch_delta_threshold {
        Gesture::Special
    } else {
        Gesture::None
    };

    if !gesture.is_none() {
        state.cooldown_remaining = thresholds.cooldown_ticks;
    }

    state.previous_pose = sample.pose();
    gesture
}

/// Classifier owning its thresholds and state
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: Thresholds,
    state: ClassifierState,
}

impl GestureClassifier {
    /// Create a classifier in its startup state
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            state: ClassifierState::default(),
        }
    }

    /// Classify one tick's sample
    pub fn classify(&mut self, sample: PoseSample) -> Gesture {
        classify(&mut self.state, &self.thresholds, sample)
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &ClassifierState {
        &self.state
    }

    /// Configured thresholds
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Return to the startup state: neutral pose, no cooldown
    pub fn reset(&mut self) {
        self.state = ClassifierState::default();
    }
}
