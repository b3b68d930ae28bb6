//! Behavioural properties of the gesture classifier

mod test_helpers;

use head_gesture_player::{
    classifier::{classify, ClassifierState, GestureClassifier, Thresholds},
    gesture::Gesture,
    pose::{Pose, PoseSample},
};
use test_helpers::{classify_all, default_classifier, repeat_face, repeat_no_face};

const ANGLES: [f64; 9] = [-45.0, -20.0, -15.0, -5.0, 0.0, 5.0, 15.0, 20.0, 45.0];

#[test]
fn test_no_face_never_fires_and_freezes_pose() {
    let thresholds = Thresholds::default();
    for cooldown in [0, 1, 5, 30] {
        for previous in [Pose::new(0.0, 0.0), Pose::new(-12.0, 33.0)] {
            let mut state = ClassifierState {
                previous_pose: previous,
                cooldown_remaining: cooldown,
            };
            let gesture = classify(&mut state, &thresholds, PoseSample::no_face());
            assert_eq!(gesture, Gesture::None);
            assert_eq!(state.previous_pose, previous);
            assert_eq!(state.cooldown_remaining, cooldown.saturating_sub(1));
        }
    }
}

#[test]
fn test_cooldown_suppresses_but_tracks_pose() {
    let thresholds = Thresholds::default();
    for &yaw in &ANGLES {
        for &pitch in &ANGLES {
            // Two or more ticks left: still cooling down after the decrement
            let mut state = ClassifierState {
                previous_pose: Pose::new(0.0, -40.0),
                cooldown_remaining: 2,
            };
            let gesture = classify(&mut state, &thresholds, PoseSample::face(yaw, pitch));
            assert_eq!(gesture, Gesture::None, "yaw {yaw} pitch {pitch}");
            assert_eq!(state.previous_pose, Pose::new(yaw, pitch));
            assert_eq!(state.cooldown_remaining, 1);
        }
    }
}

#[test]
fn test_direction_gestures() {
    let cases = [
        ((20.0, 0.0), Gesture::Right),
        ((-20.0, 0.0), Gesture::Left),
        ((0.0, 20.0), Gesture::Down),
        ((0.0, -20.0), Gesture::Up),
    ];
    for ((yaw, pitch), expected) in cases {
        let mut classifier = default_classifier();
        assert_eq!(classifier.classify(PoseSample::face(yaw, pitch)), expected);
    }
}

#[test]
fn test_special_after_large_pitch_change() {
    let thresholds = Thresholds::default();
    let mut state = ClassifierState {
        previous_pose: Pose::new(0.0, -35.0),
        cooldown_remaining: 0,
    };
    assert_eq!(
        classify(&mut state, &thresholds, PoseSample::face(0.0, 0.0)),
        Gesture::Special
    );
}

#[test]
fn test_special_needs_strictly_greater_delta() {
    let thresholds = Thresholds::default();
    let mut state = ClassifierState {
        previous_pose: Pose::new(0.0, -30.0),
        cooldown_remaining: 0,
    };
    assert_eq!(
        classify(&mut state, &thresholds, PoseSample::face(0.0, 0.0)),
        Gesture::None
    );
}

#[test]
fn test_cooldown_window_length() {
    let thresholds = Thresholds::default();
    let cooldown = thresholds.cooldown_ticks as usize;
    let mut classifier = GestureClassifier::new(thresholds);

    assert_eq!(classifier.classify(PoseSample::face(20.0, 0.0)), Gesture::Right);

    // The next cooldown - 1 ticks stay silent even with the head turned
    let silent = classify_all(&mut classifier, &repeat_face(20.0, 0.0, cooldown - 1));
    assert!(silent.iter().all(|g| g.is_none()));

    // The tick at `cooldown` may fire again
    assert_eq!(classifier.classify(PoseSample::face(20.0, 0.0)), Gesture::Right);
}

#[test]
fn test_no_face_ticks_count_towards_cooldown() {
    let mut classifier = default_classifier();
    assert_eq!(classifier.classify(PoseSample::face(0.0, 25.0)), Gesture::Down);
    classify_all(&mut classifier, &repeat_no_face(29));
    assert_eq!(classifier.classify(PoseSample::face(0.0, 25.0)), Gesture::Down);
}

#[test]
fn test_yaw_has_priority_over_pitch() {
    for &pitch in &[-45.0, -20.0, 20.0, 45.0] {
        let mut classifier = default_classifier();
        assert_eq!(classifier.classify(PoseSample::face(20.0, pitch)), Gesture::Right);
        let mut classifier = default_classifier();
        assert_eq!(classifier.classify(PoseSample::face(-20.0, pitch)), Gesture::Left);
    }
}

#[test]
fn test_pitch_magnitude_has_priority_over_special() {
    let thresholds = Thresholds::default();
    let mut state = ClassifierState {
        previous_pose: Pose::new(0.0, -40.0),
        cooldown_remaining: 0,
    };
    // Delta of 60 would be special, but the pitch itself is past the threshold
    assert_eq!(
        classify(&mut state, &thresholds, PoseSample::face(0.0, 20.0)),
        Gesture::Down
    );
}

#[test]
fn test_dropout_keeps_pre_dropout_reference() {
    let mut classifier = GestureClassifier::new(Thresholds {
        cooldown_ticks: 3,
        ..Thresholds::default()
    });

    // Cooling down after a gesture, the pose is tracked to a strong upward tilt
    assert_eq!(classifier.classify(PoseSample::face(0.0, -20.0)), Gesture::Up);
    assert_eq!(classifier.classify(PoseSample::face(0.0, -20.0)), Gesture::None);
    assert_eq!(classifier.classify(PoseSample::face(0.0, -20.0)), Gesture::None);

    // The face disappears for a while; the reference pose must not move
    classify_all(&mut classifier, &repeat_no_face(50));
    assert_eq!(classifier.state().previous_pose, Pose::new(0.0, -20.0));
    assert_eq!(classifier.state().cooldown_remaining, 0);

    // On reacquisition the delta is measured against the pre-dropout pose
    assert_eq!(classifier.classify(PoseSample::face(0.0, 12.0)), Gesture::Special);
}

#[test]
fn test_special_absorbed_by_cooldown() {
    // A nod completed entirely inside the cooldown window is never reported
    let mut classifier = GestureClassifier::new(Thresholds {
        cooldown_ticks: 5,
        ..Thresholds::default()
    });
    assert_eq!(classifier.classify(PoseSample::face(20.0, 0.0)), Gesture::Right);
    let results = classify_all(
        &mut classifier,
        &[PoseSample::face(0.0, -14.0), PoseSample::face(0.0, 14.0), PoseSample::face(0.0, -14.0)],
    );
    assert!(results.iter().all(|g| g.is_none()));
}

#[test]
fn test_custom_thresholds() {
    let mut classifier = GestureClassifier::new(Thresholds {
        yaw_threshold: 30.0,
        pitch_threshold: 5.0,
        special_pitch_delta_threshold: 8.0,
        cooldown_ticks: 0,
    });
    assert_eq!(classifier.classify(PoseSample::face(25.0, 0.0)), Gesture::None);
    assert_eq!(classifier.classify(PoseSample::face(0.0, 6.0)), Gesture::Down);
    assert_eq!(classifier.classify(PoseSample::face(0.0, -4.0)), Gesture::Special);
}
