//! Error types shared by the parser and the batch driver.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A timestamp that does not follow the fixed `HH:MM:SS,mmm` layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timestamp {text:?} does not match HH:MM:SS,mmm (first mismatch at position {position})")]
pub struct TimeStampError {
    /// The text that was rejected.
    pub text: String,
    /// Zero-based character position of the first mismatch. When only the
    /// length is wrong this is the input length, capped at 12.
    pub position: usize,
}

/// Errors raised while reading or parsing a single SRT file.
#[derive(Debug, Error)]
pub enum SrtError {
    /// A timestamp on a timing line is malformed.
    #[error("{file}:{line}: bad timestamp in {raw:?}: {cause}")]
    Format {
        file: String,
        line: usize,
        raw: String,
        #[source]
        cause: TimeStampError,
    },

    /// A line does not have the shape expected at its position in a cue.
    #[error("{file}:{line}: {reason}, found {raw:?}")]
    Parse {
        file: String,
        line: usize,
        raw: String,
        reason: String,
    },

    /// The output path is already taken by another output of the same run.
    #[error("output {} is already written by this run", path.display())]
    OutputClash { path: PathBuf },

    /// The file could not be read, decoded or written.
    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SrtError {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
