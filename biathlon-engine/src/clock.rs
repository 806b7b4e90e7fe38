//! Wall-clock and duration handling
//!
//! Race timestamps are times of day with millisecond precision and no date
//! component. Subtracting two clock values yields a signed duration; events
//! are assumed to stay within one calendar day, so no midnight wrap-around
//! correction is applied.

use crate::error::{EngineError, Result};
use chrono::{Duration, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Time-of-day format used on the wire and in all outputs
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// A wall-clock time of day with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build a clock value from components; `None` if out of range
    pub fn from_hms_milli(hour: u32, min: u32, sec: u32, milli: u32) -> Option<Self> {
        NaiveTime::from_hms_milli_opt(hour, min, sec, milli).map(Self)
    }

    /// Parse a clock value, accepting `HH:MM:SS.mmm` and `HH:MM:SS`
    ///
    /// The configuration file writes times without milliseconds; event
    /// records always carry them. Stricter length checks belong to the
    /// event record parser, not here.
    pub fn parse(s: &str) -> Result<Self> {
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map(Self)
            .map_err(|_| EngineError::ClockValue(s.to_string()))
    }

    /// Signed duration elapsed from `earlier` to `self`
    pub fn since(&self, earlier: ClockTime) -> Duration {
        self.0.signed_duration_since(earlier.0)
    }

    /// Read this clock value as an offset from midnight
    ///
    /// The start interval in the race configuration is stored as a clock
    /// value; this is how it becomes an addable duration.
    pub fn as_offset(&self) -> Duration {
        self.0.signed_duration_since(NaiveTime::MIN)
    }

    /// Shift this clock value forward, wrapping at midnight
    pub fn offset_by(&self, delta: Duration) -> ClockTime {
        let (shifted, _) = self.0.overflowing_add_signed(delta);
        Self(shifted)
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self(NaiveTime::MIN)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for ClockTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ClockTime::parse(&s).map_err(de::Error::custom)
    }
}

/// Format an elapsed duration as `HH:MM:SS.mmm`
///
/// Hours are not wrapped at 24. Negative durations render as zero; they
/// only arise from malformed input, which reports as zero-valued fields.
pub fn format_duration(d: Duration) -> String {
    let ms = d.num_milliseconds().max(0);
    let hours = ms / 3_600_000;
    let minutes = ms / 60_000 % 60;
    let seconds = ms / 1000 % 60;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
