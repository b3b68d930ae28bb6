//! Per-tick head pose samples and the sources that produce them.
//!
//! A [`PoseSource`] is polled once per capture tick. Whatever it does
//! internally (camera, cascade detector, replayed script), failures are
//! reported as [`PoseSample::no_face`] rather than as errors, because the
//! classifier downstream has no error channel.

use crate::{
    constants::{
        DEFAULT_COOLDOWN_TICKS, DEFAULT_DEMO_INTERVAL, FACE_OFFSET_DEGREES, MAX_SCRIPT_REPEAT, MAX_SCRIPT_SAMPLES,
    },
    Error, Result,
};
use log::debug;
use std::collections::VecDeque;
use std::path::Path;

/// Yaw/pitch pair in degrees.
///
/// Positive yaw is rightward, positive pitch is downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Left-right rotation
    pub yaw: f64,
    /// Up-down rotation
    pub pitch: f64,
}

impl Pose {
    /// Create a pose from yaw and pitch in degrees
    #[must_use]
    pub const fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }
}

/// One observation handed to the classifier per tick.
///
/// When `face_present` is false the angles carry no meaning and are never read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    /// Whether a face was found this tick
    pub face_present: bool,
    /// Left-right rotation in degrees
    pub yaw: f64,
    /// Up-down rotation in degrees
    pub pitch: f64,
}

impl PoseSample {
    /// A sample with a detected face
    #[must_use]
    pub const fn face(yaw: f64, pitch: f64) -> Self {
        Self {
            face_present: true,
            yaw,
            pitch,
        }
    }

    /// A sample for a tick without a face
    #[must_use]
    pub const fn no_face() -> Self {
        Self {
            face_present: false,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Yaw and pitch as a [`Pose`]
    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose::new(self.yaw, self.pitch)
    }

    /// Same presence flag, angles replaced
    #[must_use]
    pub const fn with_pose(self, pose: Pose) -> Self {
        Self {
            face_present: self.face_present,
            yaw: pose.yaw,
            pitch: pose.pitch,
        }
    }
}

/// Anything that can deliver one [`PoseSample`] per tick.
pub trait PoseSource: Send {
    /// Produce the sample for the current tick, or `None` once exhausted
    fn next_sample(&mut self) -> Option<PoseSample>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Map a detected face box to a coarse head pose.
///
/// The offset of the face centre from the frame centre, measured in quarter
/// frames, is scaled to [`FACE_OFFSET_DEGREES`]. Degenerate frames or
/// non-finite results yield a no-face sample.
#[must_use]
pub fn pose_from_face_box(face_center: (f64, f64), frame_size: (f64, f64)) -> PoseSample {
    let (cx, cy) = face_center;
    let (width, height) = frame_size;
    if width <= 0.0 || height <= 0.0 {
        return PoseSample::no_face();
    }

    let yaw = (cx - width / 2.0) / (width / 4.0) * FACE_OFFSET_DEGREES;
    let pitch = (cy - height / 2.0) / (height / 4.0) * FACE_OFFSET_DEGREES;

    if yaw.is_finite() && pitch.is_finite() {
        PoseSample::face(yaw, pitch)
    } else {
        PoseSample::no_face()
    }
}

/// Replays a fixed sequence of samples, then reports exhaustion.
pub struct ScriptedPoseSource {
    samples: VecDeque<PoseSample>,
}

impl ScriptedPoseSource {
    /// Create a source that replays `samples` in order
    #[must_use]
    pub fn new(samples: Vec<PoseSample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Load a pose script from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a line is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(parse_script(&content)?))
    }

    /// Number of samples left to replay
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl PoseSource for ScriptedPoseSource {
    fn next_sample(&mut self) -> Option<PoseSample> {
        self.samples.pop_front()
    }

    fn name(&self) -> &str {
        "script"
    }
}

/// Parse a pose script.
///
/// One sample per line: `yaw pitch` for a face, `-` for no face. A trailing
/// `xN` repeats the line N times. `#` starts a comment.
///
/// # Errors
///
/// Returns [`Error::PoseSource`] naming the first malformed line
pub fn parse_script(content: &str) -> Result<Vec<PoseSample>> {
    let mut samples = Vec::new();

    for (number, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let bad_line = || Error::PoseSource(format!("line {}: cannot parse `{}`", number + 1, raw.trim()));

        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let mut repeat = 1usize;
        if let Some(last) = tokens.last() {
            if let Some(count) = last.strip_prefix('x') {
                repeat = count.parse().map_err(|_| bad_line())?;
                if repeat > MAX_SCRIPT_REPEAT {
                    return Err(Error::PoseSource(format!(
                        "line {}: repeat count {repeat} exceeds {MAX_SCRIPT_REPEAT}",
                        number + 1
                    )));
                }
                tokens.pop();
            }
        }

        let sample = match tokens.as_slice() {
            ["-"] => PoseSample::no_face(),
            [yaw, pitch] => {
                let yaw: f64 = yaw.parse().map_err(|_| bad_line())?;
                let pitch: f64 = pitch.parse().map_err(|_| bad_line())?;
                if !yaw.is_finite() || !pitch.is_finite() {
                    return Err(bad_line());
                }
                PoseSample::face(yaw, pitch)
            }
            _ => return Err(bad_line()),
        };

        let total = samples
            .len()
            .checked_add(repeat)
            .filter(|&total| total <= MAX_SCRIPT_SAMPLES)
            .ok_or_else(|| {
                Error::PoseSource(format!(
                    "line {}: script expands to more than {MAX_SCRIPT_SAMPLES} samples",
                    number + 1
                ))
            })?;
        samples.resize(total, sample);
    }

    Ok(samples)
}

/// Synthetic movement performed by [`DemoPoseSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoMovement {
    /// Turn left
    Left,
    /// Turn right
    Right,
    /// Look up
    Up,
    /// Look down
    Down,
    /// Dip the head, hold, then snap back down past the neutral pose
    Nod,
    /// No face for this slot
    Idle,
}

const DEMO_CYCLE: [DemoMovement; 8] = [
    DemoMovement::Left,
    DemoMovement::Right,
    DemoMovement::Up,
    DemoMovement::Down,
    DemoMovement::Nod,
    DemoMovement::Idle,
    DemoMovement::Idle,
    DemoMovement::Idle,
];

/// Camera-free stand-in that plays head movements on a timer.
///
/// Test double for running the player without a camera. Between movements it
/// reports no face. Every `interval` ticks it performs the next movement of a
/// fixed cycle. A nod holds an upward tilt for `nod_hold` ticks and then
/// snaps to a slight downward tilt, so with matching cooldown it reads as an
/// up gesture followed by a special one.
pub struct DemoPoseSource {
    interval: u64,
    nod_hold: u32,
    tick: u64,
    pending: VecDeque<PoseSample>,
}

impl DemoPoseSource {
    /// Create a demo source performing one movement every `interval` ticks
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            nod_hold: DEFAULT_COOLDOWN_TICKS,
            tick: 0,
            pending: VecDeque::new(),
        }
    }

    /// Set how many ticks the nod holds its upward tilt
    #[must_use]
    pub fn with_nod_hold(mut self, ticks: u32) -> Self {
        self.nod_hold = ticks.max(1);
        self
    }

    fn perform(&mut self, movement: DemoMovement) {
        debug!("Demo movement: {:?}", movement);
        match movement {
            DemoMovement::Left => self.pending.push_back(PoseSample::face(-25.0, 0.0)),
            DemoMovement::Right => self.pending.push_back(PoseSample::face(25.0, 0.0)),
            DemoMovement::Up => self.pending.push_back(PoseSample::face(0.0, -25.0)),
            DemoMovement::Down => self.pending.push_back(PoseSample::face(0.0, 25.0)),
            DemoMovement::Nod => {
                for _ in 0..self.nod_hold {
                    self.pending.push_back(PoseSample::face(0.0, -20.0));
                }
                self.pending.push_back(PoseSample::face(0.0, 12.0));
            }
            DemoMovement::Idle => {}
        }
    }
}

impl Default for DemoPoseSource {
    fn default() -> Self {
        Self::new(DEFAULT_DEMO_INTERVAL)
    }
}

impl PoseSource for DemoPoseSource {
    fn next_sample(&mut self) -> Option<PoseSample> {
        self.tick += 1;
        if self.tick % self.interval == 0 {
            let slot = usize::try_from((self.tick / self.interval) % DEMO_CYCLE.len() as u64).unwrap_or(0);
            self.perform(DEMO_CYCLE[slot]);
        }
        Some(self.pending.pop_front().unwrap_or_else(PoseSample::no_face))
    }

    fn name(&self) -> &str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_box_centred_is_neutral() {
        let sample = pose_from_face_box((320.0, 240.0), (640.0, 480.0));
        assert!(sample.face_present);
        assert_eq!(sample.yaw, 0.0);
        assert_eq!(sample.pitch, 0.0);
    }

    #[test]
    fn test_face_box_sign_conventions() {
        // Quarter frame right and quarter frame down
        let sample = pose_from_face_box((480.0, 360.0), (640.0, 480.0));
        assert!((sample.yaw - 30.0).abs() < 1e-9);
        assert!((sample.pitch - 30.0).abs() < 1e-9);

        let sample = pose_from_face_box((160.0, 120.0), (640.0, 480.0));
        assert!((sample.yaw + 30.0).abs() < 1e-9);
        assert!((sample.pitch + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_face_box_degenerate_frame() {
        assert!(!pose_from_face_box((10.0, 10.0), (0.0, 480.0)).face_present);
        assert!(!pose_from_face_box((f64::NAN, 10.0), (640.0, 480.0)).face_present);
    }

    #[test]
    fn test_parse_script() {
        let script = "# warm-up\n0 0\n- x3\n\n20.5 -4 # right\n";
        let samples = parse_script(script).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], PoseSample::face(0.0, 0.0));
        assert!(samples[1..4].iter().all(|s| !s.face_present));
        assert_eq!(samples[4], PoseSample::face(20.5, -4.0));
    }

    #[test]
    fn test_parse_script_errors_name_the_line() {
        let err = parse_script("0 0\n1 2 3\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(parse_script("abc 1").is_err());
        assert!(parse_script("- xabc").is_err());
        assert!(parse_script("NaN 0").is_err());
    }

    #[test]
    fn test_parse_script_rejects_oversized_repeats() {
        let err = parse_script("0 0\n- x18446744073709551615\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = parse_script(&format!("- x{}", MAX_SCRIPT_REPEAT + 1)).unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        let at_limit = format!("- x{MAX_SCRIPT_REPEAT}\n").repeat(MAX_SCRIPT_SAMPLES / MAX_SCRIPT_REPEAT);
        assert_eq!(parse_script(&at_limit).unwrap().len(), MAX_SCRIPT_SAMPLES);

        let err = parse_script(&format!("{at_limit}0 0\n")).unwrap_err();
        assert!(err.to_string().contains("more than"));
    }

    #[test]
    fn test_scripted_source_exhausts() {
        let mut source = ScriptedPoseSource::new(vec![PoseSample::face(1.0, 2.0), PoseSample::no_face()]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_sample(), Some(PoseSample::face(1.0, 2.0)));
        assert_eq!(source.next_sample(), Some(PoseSample::no_face()));
        assert_eq!(source.next_sample(), None);
    }

    #[test]
    fn test_demo_source_is_faceless_between_movements() {
        let mut source = DemoPoseSource::new(10);
        for _ in 0..9 {
            assert!(!source.next_sample().unwrap().face_present);
        }
        // Tick 10 is slot 1 of the cycle: right
        assert_eq!(source.next_sample(), Some(PoseSample::face(25.0, 0.0)));
        assert!(!source.next_sample().unwrap().face_present);
    }

    #[test]
    fn test_demo_nod_holds_then_snaps_back() {
        let mut source = DemoPoseSource::new(100).with_nod_hold(3);
        // Slot 4 (nod) starts at tick 400
        for _ in 0..399 {
            source.next_sample();
        }
        let nod: Vec<PoseSample> = (0..4).filter_map(|_| source.next_sample()).collect();
        assert_eq!(&nod[..3], &[PoseSample::face(0.0, -20.0); 3]);
        assert_eq!(nod[3], PoseSample::face(0.0, 12.0));
    }
}
