//! One parsed SRT cue.

use super::timestamp::TimeStamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single SRT cue (sequence number, time range, text lines).
/// Entries are built whole and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    number: u32,
    start: TimeStamp,
    stop: TimeStamp,
    lines: Vec<String>,
}

impl SubtitleEntry {
    /// Build an entry from the fields read off a cue block.
    /// Neither `start <= stop` nor the numbering is checked.
    pub fn from_parsed_fields(
        number: u32,
        start: TimeStamp,
        stop: TimeStamp,
        lines: Vec<String>,
    ) -> Self {
        Self {
            number,
            start,
            stop,
            lines,
        }
    }

    /// Entry number zero spanning `00:00:00,000` with no text.
    pub fn empty() -> Self {
        Self::from_parsed_fields(0, TimeStamp::empty(), TimeStamp::empty(), Vec::new())
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn start(&self) -> TimeStamp {
        self.start
    }

    pub fn stop(&self) -> TimeStamp {
        self.stop
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Renders the cue as an SRT block without the separating blank line.
impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.number)?;
        writeln!(f, "{} --> {}", self.start, self.stop)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
