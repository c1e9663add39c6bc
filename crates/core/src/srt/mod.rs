//! This module is responsible for turning SRT text into subtitle entries.
//! Parsing is a line-by-line state machine; it performs no I/O.

use crate::error::{SrtError, TimeStampError};
use tracing::{debug, trace};

mod entry;
mod timestamp;

pub use entry::SubtitleEntry;
pub use timestamp::TimeStamp;

/// File name used in diagnostics when the caller does not supply one.
pub const UNNAMED_SOURCE: &str = "<input>";

/// Where the parser stands inside a cue block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Between cues; empty and whitespace-only lines are skipped here.
    AwaitingNumber,
    /// The sequence number was read, the timing line comes next.
    AwaitingTimestamps { number: u32 },
    /// Accumulating text lines until an empty line closes the cue.
    /// Whitespace-only lines are kept as text.
    CollectingSubtitles {
        number: u32,
        start: TimeStamp,
        stop: TimeStamp,
        lines: Vec<String>,
    },
}

/// A rejected line, before the file name and line number are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    /// A timestamp on the timing line is malformed.
    Format(TimeStampError),
    /// The line has the wrong shape for its position; holds the reason.
    Parse(&'static str),
}

impl LineFault {
    fn locate(self, file: &str, line: usize, raw: &str) -> SrtError {
        match self {
            LineFault::Format(cause) => SrtError::Format {
                file: file.to_string(),
                line,
                raw: raw.to_string(),
                cause,
            },
            LineFault::Parse(reason) => SrtError::Parse {
                file: file.to_string(),
                line,
                raw: raw.to_string(),
                reason: reason.to_string(),
            },
        }
    }
}

/// Advance the state machine by one line (without its terminator).
/// Returns the next state and the entry completed by this line, if any.
pub fn step(
    state: ParserState,
    line: &str,
) -> Result<(ParserState, Option<SubtitleEntry>), LineFault> {
    match state {
        ParserState::AwaitingNumber if line.trim().is_empty() => {
            Ok((ParserState::AwaitingNumber, None))
        }
        ParserState::AwaitingNumber => {
            let number = parse_number(line)?;
            Ok((ParserState::AwaitingTimestamps { number }, None))
        }
        ParserState::AwaitingTimestamps { number } => {
            let (start, stop) = parse_times(line)?;
            Ok((
                ParserState::CollectingSubtitles {
                    number,
                    start,
                    stop,
                    lines: Vec::new(),
                },
                None,
            ))
        }
        ParserState::CollectingSubtitles {
            number,
            start,
            stop,
            lines,
        } if line.is_empty() => Ok((
            ParserState::AwaitingNumber,
            Some(SubtitleEntry::from_parsed_fields(number, start, stop, lines)),
        )),
        ParserState::CollectingSubtitles {
            number,
            start,
            stop,
            mut lines,
        } => {
            lines.push(line.to_string());
            Ok((
                ParserState::CollectingSubtitles {
                    number,
                    start,
                    stop,
                    lines,
                },
                None,
            ))
        }
    }
}

/// Close the state machine at end of input, flushing a cue that had no
/// trailing blank line.
pub fn finish(state: ParserState) -> Result<Option<SubtitleEntry>, LineFault> {
    match state {
        ParserState::AwaitingNumber => Ok(None),
        ParserState::AwaitingTimestamps { .. } => {
            Err(LineFault::Parse("input ended before the timing line"))
        }
        ParserState::CollectingSubtitles {
            number,
            start,
            stop,
            lines,
        } => Ok(Some(SubtitleEntry::from_parsed_fields(
            number, start, stop, lines,
        ))),
    }
}

/// Parse SRT text into a list of entries in file order.
pub fn parse(input: &str) -> Result<Vec<SubtitleEntry>, SrtError> {
    parse_named(UNNAMED_SOURCE, input)
}

/// Parse SRT text, naming `file` in any error.
/// A leading non-alphanumeric character (usually a BOM) is dropped and
/// `\r\n` line endings are treated like `\n`.
pub fn parse_named(file: &str, input: &str) -> Result<Vec<SubtitleEntry>, SrtError> {
    trace!("parse_named(file={file}, bytes={})", input.len());
    let (body, skipped_lines) = strip_leading_artifact(input);
    let mut state = ParserState::AwaitingNumber;
    let mut entries = Vec::new();
    let mut line_no = skipped_lines;
    let mut last = "";
    for raw in body.split('\n') {
        line_no += 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let (next, emitted) = step(state, line).map_err(|f| f.locate(file, line_no, line))?;
        entries.extend(emitted);
        state = next;
        last = line;
    }
    if let Some(entry) = finish(state).map_err(|f| f.locate(file, line_no, last))? {
        entries.push(entry);
    }
    debug!("parsed {} entries from {file}", entries.len());
    Ok(entries)
}

/// Drop the first character when it is not alphanumeric. Returns the rest
/// and how many line breaks were dropped with it.
fn strip_leading_artifact(input: &str) -> (&str, usize) {
    match input.chars().next() {
        Some(c) if !c.is_alphanumeric() => {
            let skipped = usize::from(c == '\n');
            (&input[c.len_utf8()..], skipped)
        }
        _ => (input, 0),
    }
}

fn parse_number(line: &str) -> Result<u32, LineFault> {
    let token = line.trim();
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LineFault::Parse("expected a bare sequence number"));
    }
    token
        .parse()
        .map_err(|_| LineFault::Parse("sequence number is out of range"))
}

/// Parse a timing line like `00:00:01,000 --> 00:00:02,000`.
fn parse_times(line: &str) -> Result<(TimeStamp, TimeStamp), LineFault> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [start, "-->", stop] => {
            let start = TimeStamp::parse(start).map_err(LineFault::Format)?;
            let stop = TimeStamp::parse(stop).map_err(LineFault::Format)?;
            Ok((start, stop))
        }
        _ => Err(LineFault::Parse("expected `<start> --> <stop>`")),
    }
}

/// Format entries back to SRT text.
/// The way this works is by writing each block followed by a blank line.
pub fn format(entries: &[SubtitleEntry]) -> String {
    entries.iter().map(|e| format!("{e}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUES: &str = "1\n00:00:01,000 --> 00:00:02,000\nfirst\n\n\
                            2\n00:00:03,000 --> 00:00:04,000\nsecond\nline two\n";

    #[test]
    fn parses_single_cue() {
        let input = "1\n00:00:01,000 --> 00:00:02,500\nHello world\n\n";
        let entries = parse(input).unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.number(), 1);
        assert_eq!(entry.start().to_string(), "00:00:01,000");
        assert_eq!(entry.stop().to_string(), "00:00:02,500");
        assert_eq!(entry.lines(), ["Hello world".to_string()]);
    }

    #[test]
    fn flushes_last_cue_without_trailing_blank() {
        let entries = parse(TWO_CUES).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].number(), 2);
        assert_eq!(entries[1].lines(), ["second", "line two"]);

        let no_newline = TWO_CUES.trim_end();
        assert_eq!(parse(no_newline).unwrap(), entries);
    }

    #[test]
    fn strips_leading_artifact() {
        let with_bom = format!("\u{feff}{TWO_CUES}");
        assert_eq!(parse(&with_bom).unwrap(), parse(TWO_CUES).unwrap());
    }

    #[test]
    fn treats_crlf_like_lf() {
        let crlf = TWO_CUES.replace('\n', "\r\n");
        assert_eq!(parse(&crlf).unwrap(), parse(TWO_CUES).unwrap());
    }

    #[test]
    fn tolerates_extra_blank_lines_and_spacing() {
        let input = "\n\n\n1\n00:00:01,000   -->\t00:00:02,000\ntext\n\n\n\n  \n2\n00:00:02,000 --> 00:00:03,000\nmore\n";
        let entries = parse(input).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].lines(), ["text"]);
    }

    #[test]
    fn whitespace_only_line_stays_inside_cue() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\nline\n   \nmore\n";
        let entries = parse(input).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lines(), ["line", "   ", "more"]);

        let crlf = input.replace('\n', "\r\n");
        assert_eq!(parse(&crlf).unwrap(), entries);
    }

    #[test]
    fn survives_long_runs_of_blank_lines() {
        let input = format!("{}1\n00:00:01,000 --> 00:00:02,000\nhi\n", "\n".repeat(100_000));
        assert_eq!(parse(&input).unwrap().len(), 1);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\u{feff}").unwrap().is_empty());
        assert!(parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn keeps_text_verbatim_and_sequence_numbers_as_declared() {
        let input = "7\n00:00:05,000 --> 00:00:01,000\n  <i>indented</i>  \n\n3\n00:00:00,000 --> 00:00:00,500\n- a\n";
        let entries = parse(input).unwrap();
        assert_eq!(entries[0].number(), 7);
        assert_eq!(entries[0].lines(), ["  <i>indented</i>  "]);
        assert!(entries[0].start() > entries[0].stop());
        assert_eq!(entries[1].number(), 3);
    }

    #[test]
    fn cue_without_text_is_kept() {
        let input = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:02,000 --> 00:00:03,000\nb\n";
        let entries = parse(input).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].lines().is_empty());
    }

    #[test]
    fn rejects_non_numeric_sequence_line() {
        let err = parse_named("ep.srt", "1 2\n00:00:01,000 --> 00:00:02,000\nx\n").unwrap_err();
        match err {
            SrtError::Parse { file, line, raw, .. } => {
                assert_eq!(file, "ep.srt");
                assert_eq!(line, 1);
                assert_eq!(raw, "1 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_timing_line_without_arrow() {
        let err = parse("1\n00:00:01,000 00:00:02,500\nx\n").unwrap_err();
        assert!(matches!(err, SrtError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let err = parse("1\n00:00:01.000 --> 00:00:02,500\nx\n").unwrap_err();
        match err {
            SrtError::Format { line, cause, .. } => {
                assert_eq!(line, 2);
                assert_eq!(cause.position, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_truncated_cue() {
        let err = parse("1\n00:00:01,000 --> 00:00:02,000\nx\n\n2").unwrap_err();
        assert!(matches!(err, SrtError::Parse { line: 5, .. }), "{err}");
    }

    #[test]
    fn line_numbers_account_for_stripped_newline() {
        let err = parse("\n\nx\n").unwrap_err();
        assert!(matches!(err, SrtError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn step_reports_fault_kind() {
        let timing = ParserState::AwaitingTimestamps { number: 1 };
        let fault = step(timing.clone(), "00:00:01.000 --> 00:00:02,000").unwrap_err();
        assert!(matches!(fault, LineFault::Format(ref e) if e.position == 8));
        let fault = step(timing, "00:00:01,000 00:00:02,000").unwrap_err();
        assert_eq!(fault, LineFault::Parse("expected `<start> --> <stop>`"));
        let fault = step(ParserState::AwaitingNumber, "1 2").unwrap_err();
        assert_eq!(fault, LineFault::Parse("expected a bare sequence number"));
    }

    #[test]
    fn step_emits_on_blank_line() {
        let state = ParserState::CollectingSubtitles {
            number: 1,
            start: TimeStamp::empty(),
            stop: TimeStamp::empty(),
            lines: vec!["a".into()],
        };
        let (next, emitted) = step(state, "").unwrap();
        assert_eq!(next, ParserState::AwaitingNumber);
        assert_eq!(emitted.unwrap().lines(), ["a"]);
    }

    #[test]
    fn roundtrip_srt() {
        let input = "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n";
        let entries = parse(input).unwrap();
        assert_eq!(format(&entries), input);
        assert_eq!(parse(&format(&parse(TWO_CUES).unwrap())).unwrap(), parse(TWO_CUES).unwrap());
    }
}
