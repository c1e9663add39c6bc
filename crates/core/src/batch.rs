//! Batch conversion of SRT files to plain text.
//! This module wires file discovery, parsing, extraction and output writing.

use crate::error::SrtError;
use crate::extract::{combine_text, ParsedFile};
use crate::srt;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Directory read when no input is given.
pub const DEFAULT_INPUT_DIR: &str = "srt";
/// Directory written when no output is given.
pub const DEFAULT_OUTPUT_DIR: &str = "txt";
/// File name of the combined corpus inside the output directory.
pub const DEFAULT_COMBINED_NAME: &str = "all_files.txt";

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// A directory of `.srt` files or a single `.srt` file.
    pub input: PathBuf,
    /// Where the `.txt` files and the combined corpus are written.
    pub output_dir: PathBuf,
    pub combined_name: String,
    /// Also write the parsed entries as `<stem>.json`.
    pub write_json: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            combined_name: DEFAULT_COMBINED_NAME.to_string(),
            write_json: false,
        }
    }
}

/// A file that could not be converted.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: SrtError,
}

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// `.txt` files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Path of the combined corpus.
    pub combined: PathBuf,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Whether `path` carries an `srt` extension, ignoring ASCII case.
pub fn is_srt(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("srt"))
        .unwrap_or(false)
}

/// List the `.srt` files directly inside `dir` in directory listing order.
pub fn discover_srt_files(dir: &Path) -> Result<Vec<PathBuf>> {
    trace!("discover_srt_files(dir={})", dir.display());
    let mut files = Vec::new();
    let listing =
        fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))?;
    for entry in listing {
        let path = entry
            .with_context(|| format!("cannot list {}", dir.display()))?
            .path();
        if is_srt(&path) && path.is_file() {
            files.push(path);
        }
    }
    debug!("found {} srt files in {}", files.len(), dir.display());
    Ok(files)
}

/// Read and parse one SRT file.
pub fn read_srt(path: &Path) -> Result<ParsedFile, SrtError> {
    trace!("read_srt(path={})", path.display());
    let content = fs::read_to_string(path).map_err(|e| SrtError::io(path, e))?;
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let entries = srt::parse_named(&name, &content)?;
    Ok(ParsedFile::new(name, entries))
}

/// Output path for `input`: same file name with a `.txt` extension inside
/// `output_dir`.
pub fn text_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir
        .join(input.file_name().unwrap_or_default())
        .with_extension("txt")
}

/// Convert a single SRT file, writing its `.txt` (and optionally `.json`)
/// into the output directory.
pub fn process_file(
    path: &Path,
    options: &BatchOptions,
) -> Result<(ParsedFile, PathBuf), SrtError> {
    let parsed = read_srt(path)?;
    let out = text_output_path(path, &options.output_dir);
    info!("writing file: {}", out.display());
    fs::write(&out, parsed.text()).map_err(|e| SrtError::io(&out, e))?;
    if options.write_json {
        let json_path = out.with_extension("json");
        let json = serde_json::to_string_pretty(&parsed.entries)
            .map_err(|e| SrtError::io(&json_path, e.into()))?;
        fs::write(&json_path, json).map_err(|e| SrtError::io(&json_path, e))?;
        debug!("wrote entries to {}", json_path.display());
    }
    Ok((parsed, out))
}

/// Paths `process_file` writes for `input`.
fn output_paths(input: &Path, options: &BatchOptions) -> Vec<PathBuf> {
    let txt = text_output_path(input, &options.output_dir);
    if options.write_json {
        let json = txt.with_extension("json");
        vec![txt, json]
    } else {
        vec![txt]
    }
}

/// Convert every SRT file named by `options.input` and write the combined
/// corpus. A failing file is reported and skipped; only failures to list
/// the input or to write the combined corpus abort the run.
///
/// A file whose outputs would overwrite the combined corpus or an earlier
/// file's outputs is recorded as a failure and left unwritten.
pub fn run(options: &BatchOptions) -> Result<BatchReport> {
    trace!("run(options={options:?})");
    if !options.input.exists() {
        bail!("cannot list {}: no such file or directory", options.input.display());
    }
    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("cannot create {}", options.output_dir.display()))?;
    let inputs = if options.input.is_dir() {
        discover_srt_files(&options.input)?
    } else {
        vec![options.input.clone()]
    };

    let combined = options.output_dir.join(&options.combined_name);
    let mut claimed = HashSet::from([combined.clone()]);
    let mut parsed_files = Vec::new();
    let mut written = Vec::new();
    let mut failures = Vec::new();
    for path in inputs {
        let outputs = output_paths(&path, options);
        if let Some(taken) = outputs.iter().find(|p| claimed.contains(*p)) {
            let error = SrtError::OutputClash {
                path: taken.clone(),
            };
            warn!("skipping {}: {error}", path.display());
            failures.push(FileFailure { path, error });
            continue;
        }
        claimed.extend(outputs);
        match process_file(&path, options) {
            Ok((parsed, out)) => {
                parsed_files.push(parsed);
                written.push(out);
            }
            Err(error) => {
                warn!("skipping {}: {error}", path.display());
                failures.push(FileFailure { path, error });
            }
        }
    }

    info!("writing combined text to {}", combined.display());
    fs::write(&combined, combine_text(&parsed_files))
        .with_context(|| format!("cannot write {}", combined.display()))?;
    info!(
        "converted {} files, {} failed",
        written.len(),
        failures.len()
    );
    Ok(BatchReport {
        written,
        combined,
        failures,
    })
}
