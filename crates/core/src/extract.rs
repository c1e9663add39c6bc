//! Turn parsed entries back into plain dialogue text.

use crate::srt::SubtitleEntry;
use serde::{Deserialize, Serialize};

/// The parsed entries of one subtitle file, keyed by its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub name: String,
    pub entries: Vec<SubtitleEntry>,
}

impl ParsedFile {
    pub fn new(name: impl Into<String>, entries: Vec<SubtitleEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Dialogue text of this file, see [`extract_text`].
    pub fn text(&self) -> String {
        extract_text(&self.entries)
    }
}

/// Join every text line of every entry, each followed by `\n`, in entry order.
pub fn extract_text(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();
    for line in entries.iter().flat_map(|e| e.lines()) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Concatenate the text of each file in the given order, appending a blank
/// line after every file's block.
pub fn combine_text(files: &[ParsedFile]) -> String {
    files.iter().map(|f| f.text() + "\n").collect()
}
