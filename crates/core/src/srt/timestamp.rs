//! The `HH:MM:SS,mmm` timestamp used on SRT timing lines.

use crate::error::TimeStampError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Expected character class at each of the 12 positions.
const LAYOUT: &[u8; 12] = b"dd:dd:dd,ddd";

/// A single subtitle timestamp.
///
/// Field order gives chronological ordering when comparing.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeStamp {
    hours: u32,
    minutes: u8,
    seconds: u8,
    milliseconds: u16,
}

impl TimeStamp {
    /// The all-zero timestamp `00:00:00,000`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse exactly `HH:MM:SS,mmm`.
    /// Every position is checked against the layout before any field is read.
    pub fn parse(text: &str) -> Result<Self, TimeStampError> {
        let bytes = text.as_bytes();
        let mismatch = LAYOUT
            .iter()
            .zip(bytes)
            .position(|(&class, &b)| match class {
                b'd' => !b.is_ascii_digit(),
                sep => b != sep,
            });
        if let Some(position) = mismatch {
            return Err(TimeStampError {
                text: text.to_string(),
                position,
            });
        }
        if bytes.len() != LAYOUT.len() {
            return Err(TimeStampError {
                text: text.to_string(),
                position: bytes.len().min(LAYOUT.len()),
            });
        }
        Ok(Self {
            hours: digits(&bytes[0..2]),
            minutes: digits(&bytes[3..5]) as u8,
            seconds: digits(&bytes[6..8]) as u8,
            milliseconds: digits(&bytes[9..12]) as u16,
        })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn milliseconds(&self) -> u16 {
        self.milliseconds
    }

    /// Total offset in milliseconds.
    pub fn total_millis(&self) -> u64 {
        ((self.hours as u64 * 60 + self.minutes as u64) * 60 + self.seconds as u64) * 1000
            + self.milliseconds as u64
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.total_millis())
    }
}

/// Decimal value of a run of ASCII digits already validated by the caller.
fn digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

impl FromStr for TimeStamp {
    type Err = TimeStampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeStamp {
    type Error = TimeStampError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeStamp> for String {
    fn from(value: TimeStamp) -> Self {
        value.to_string()
    }
}
