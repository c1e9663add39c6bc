//! Parse SRT subtitle files and extract their dialogue as plain text.

pub mod batch;
pub mod error;
pub mod extract;
pub mod srt;

pub use error::{SrtError, TimeStampError};
pub use extract::{combine_text, extract_text, ParsedFile};
pub use srt::{SubtitleEntry, TimeStamp};
