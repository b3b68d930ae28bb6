//! Constants used throughout the application

/// Default capture cadence (ticks per second)
pub const DEFAULT_FPS: u32 = 30;

/// Default yaw magnitude, in degrees, above which a left/right gesture fires
pub const DEFAULT_YAW_THRESHOLD: f64 = 15.0;

/// Default pitch magnitude, in degrees, above which an up/down gesture fires
pub const DEFAULT_PITCH_THRESHOLD: f64 = 15.0;

/// Default tick-to-tick pitch change, in degrees, that counts as a nod
pub const DEFAULT_SPECIAL_PITCH_DELTA_THRESHOLD: f64 = 30.0;

/// Default number of ticks between two emitted gestures
pub const DEFAULT_COOLDOWN_TICKS: u32 = 30;

/// Audio file extensions picked up by the track scanner (lowercase, no dot)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

/// Maximum number of playback log lines kept in memory
pub const MAX_LOG_MESSAGES: usize = 100;

/// Initial playback volume
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Track name reported when the library is empty
pub const NO_TRACKS_NAME: &str = "No tracks available";

/// Haar cascade used by the camera source when `--cascade` is not given.
/// Ships with OpenCV under `share/opencv4/haarcascades/`.
pub const DEFAULT_CASCADE_PATH: &str = "assets/haarcascade_frontalface_default.xml";

/// Largest `xN` repeat accepted on one pose script line
pub const MAX_SCRIPT_REPEAT: usize = 100_000;

/// Largest number of samples a pose script may expand to
pub const MAX_SCRIPT_SAMPLES: usize = 1_000_000;

/// Ticks between two synthetic movements of the demo pose source (~2 s at 30 fps)
pub const DEFAULT_DEMO_INTERVAL: u64 = 60;

/// Degrees of head rotation mapped from a face offset of a quarter frame
pub const FACE_OFFSET_DEGREES: f64 = 30.0;

/// Ticks between two status display refreshes
pub const DEFAULT_REFRESH_TICKS: u64 = 15;
