//! Binary entry point for the subtitle text extractor.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use subtext_core::batch::{
    self, BatchOptions, DEFAULT_COMBINED_NAME, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command line options for the binary.
#[derive(Parser)]
struct Cli {
    /// Directory of SRT files, or a single SRT file.
    #[arg(default_value = DEFAULT_INPUT_DIR)]
    input: PathBuf,

    /// Directory that receives the text files.
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// File name of the combined text of all inputs.
    #[arg(long, default_value = DEFAULT_COMBINED_NAME)]
    combined: String,

    /// Also write the parsed entries of each file as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose debug and trace logs.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            input: self.input.clone(),
            output_dir: self.output.clone(),
            combined_name: self.combined.clone(),
            write_json: self.json,
        }
    }
}

/// Application entry point which parses CLI args, sets up logging and
/// delegates to the core library.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("subtext=trace".parse()?)
            .add_directive("subtext_core=trace".parse()?)
            .add_directive("info".parse()?)
    } else {
        EnvFilter::default()
            .add_directive("subtext=info".parse()?)
            .add_directive("subtext_core=info".parse()?)
            .add_directive("warn".parse()?)
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let report = batch::run(&cli.batch_options())?;
    info!("wrote {}", report.combined.display());
    if !report.is_clean() {
        for failure in &report.failures {
            error!("{}: {}", failure.path.display(), failure.error);
        }
        bail!("{} file(s) could not be converted", report.failures.len());
    }
    Ok(())
}
