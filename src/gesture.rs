//! Discrete head gestures emitted by the classifier.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One classified head movement.
///
/// `None` means "no gesture this tick" and is never forwarded to playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    /// Head turned left (negative yaw)
    Left,
    /// Head turned right (positive yaw)
    Right,
    /// Head tilted up (negative pitch)
    Up,
    /// Head tilted down (positive pitch)
    Down,
    /// Rapid nod: large pitch change between two ticks
    Special,
    /// Nothing detected
    #[default]
    None,
}

impl Gesture {
    /// All gestures that can reach the playback controller
    pub const ACTIONABLE: [Gesture; 5] = [
        Gesture::Left,
        Gesture::Right,
        Gesture::Up,
        Gesture::Down,
        Gesture::Special,
    ];

    /// True for [`Gesture::None`]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Gesture::None)
    }

    /// Lowercase name used in logs and scripts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Gesture::Left => "left",
            Gesture::Right => "right",
            Gesture::Up => "up",
            Gesture::Down => "down",
            Gesture::Special => "special",
            Gesture::None => "none",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gesture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Gesture::Left),
            "right" => Ok(Gesture::Right),
            "up" => Ok(Gesture::Up),
            "down" => Ok(Gesture::Down),
            "special" | "nod" => Ok(Gesture::Special),
            "none" => Ok(Gesture::None),
            other => Err(Error::InvalidInput(format!("Unknown gesture: {other}"))),
        }
    }
}
