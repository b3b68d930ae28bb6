//! Helper functions and utilities for tests
#![allow(dead_code)]

use head_gesture_player::{
    classifier::{GestureClassifier, Thresholds},
    gesture::Gesture,
    playback::{NullBackend, PlaybackController},
    pose::PoseSample,
};
use std::fs;
use tempfile::TempDir;

/// `n` copies of a face sample
pub fn repeat_face(yaw: f64, pitch: f64, n: usize) -> Vec<PoseSample> {
    vec![PoseSample::face(yaw, pitch); n]
}

/// `n` no-face samples
pub fn repeat_no_face(n: usize) -> Vec<PoseSample> {
    vec![PoseSample::no_face(); n]
}

/// Classifier with default thresholds
pub fn default_classifier() -> GestureClassifier {
    GestureClassifier::new(Thresholds::default())
}

/// Feed every sample through `classifier` and collect the results
pub fn classify_all(classifier: &mut GestureClassifier, samples: &[PoseSample]) -> Vec<Gesture> {
    samples.iter().map(|&sample| classifier.classify(sample)).collect()
}

/// Temporary music directory holding empty files with the given names
pub fn music_dir_with(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("temporary music directory");
    for name in names {
        fs::write(dir.path().join(name), b"").expect("write track fixture");
    }
    dir
}

/// Silent controller over `dir` with a fixed shuffle seed
pub fn silent_controller(dir: &TempDir) -> PlaybackController {
    PlaybackController::new(dir.path(), Box::new(NullBackend::new()), 0.5).with_seed(42)
}
