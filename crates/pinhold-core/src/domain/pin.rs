//! Pin-level value types: levels, directions and snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Line offset on a GPIO chip.
pub type PinNumber = u32;

/// Logical level of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// The digit the holder tool expects in a `pin=level` assignment.
    #[must_use]
    pub const fn as_digit(self) -> &'static str {
        match self {
            Self::Low => "0",
            Self::High => "1",
        }
    }

    /// Interpret a boolean as a level (`true` = high).
    #[must_use]
    pub const fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_digit())
    }
}

/// Configured direction of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Point-in-time view of a single pin, as reported upward by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSnapshot {
    /// Line offset the snapshot describes.
    pub pin: PinNumber,
    /// Direction at the time of the read.
    pub direction: Direction,
    /// Commanded level for outputs, probed level for inputs.
    pub level: Level,
}

impl PinSnapshot {
    #[must_use]
    pub const fn new(pin: PinNumber, direction: Direction, level: Level) -> Self {
        Self {
            pin,
            direction,
            level,
        }
    }
}
