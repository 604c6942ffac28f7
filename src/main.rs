//! This program looks for recurring code idioms in a source tree by counting
//! the most frequent n-grams of words or tokens across its source files.

mod config;
mod file;
mod ngram;
mod pipeline;
mod progress;
mod report;
mod stats;
mod text;
mod top;
mod walk;

use crate::{
    config::Config,
    ngram::Mode,
    progress::ProgressReport,
    report::{Format, Reporter},
};
use clap::Parser;
use log::LevelFilter;
use std::{io::BufWriter, num::NonZeroUsize, path::PathBuf};

/// Find the most common n-grams in a source tree
///
/// Every file with the right extension below the root directory is loaded,
/// split into words or tokens, and cut into overlapping windows of a fixed
/// size. Identical windows are counted across the whole tree, and a slice of
/// the resulting ranking is printed at the end.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Root directory of the source tree to be scanned
    root: PathBuf,

    /// What the n-grams are made of
    ///
    /// "tokens" strips comments and keeps runs of word characters, which is
    /// best for finding code idioms across a whole project. "words" splits the
    /// raw file text on whitespace, which gives a quicker, rougher scan.
    #[arg(short, long, value_enum, default_value_t = Mode::Tokens)]
    mode: Mode,

    /// Number of words or tokens per n-gram
    ///
    /// Defaults to 3 in token mode and 6 in word mode.
    #[arg(short = 'n', long)]
    window: Option<NonZeroUsize>,

    /// Extension of the source files to be scanned
    #[arg(short, long, default_value = ".java")]
    extension: Box<str>,

    /// Name of a directory to be skipped, along with everything inside it
    ///
    /// Can be specified multiple times. A directory is only skipped when its
    /// own name matches, so "build" skips "src/build" but not
    /// "src/buildtools". Specifying this replaces the default list (docs,
    /// gradle, SPD-classes, build, bin, out, test).
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<Box<str>>,

    /// Number of ranked n-grams to display
    #[arg(short = 'k', long, default_value = "10")]
    top: usize,

    /// Number of top-ranked n-grams to skip before displaying anything
    #[arg(short, long, default_value_t = 0)]
    skip: usize,

    /// Display n-grams ranked 791 to 800 instead of the top ones
    ///
    /// Looking at less common n-grams helps telling actual idioms apart from
    /// language boilerplate when tuning the window size.
    #[arg(long, conflicts_with_all = ["top", "skip"])]
    debug_slice: bool,

    /// Rank the n-grams of each directory separately
    ///
    /// Only the files directly inside each directory are counted together, and
    /// a report is printed after each directory with source files.
    #[arg(long)]
    per_directory: bool,

    /// Stop after the report of the first directory with source files
    ///
    /// Beware that nothing is aggregated across the source tree in this mode:
    /// the run ends as soon as one directory has been reported.
    #[arg(long, requires = "per_directory")]
    stop_after_first: bool,

    /// Skip files that cannot be read or decoded instead of aborting
    ///
    /// A warning is emitted for every skipped file.
    #[arg(long)]
    skip_unreadable: bool,

    /// Report format
    ///
    /// "csv" and "json" reports are meant for automation, so progress messages
    /// are not printed to stdout in these formats. With --per-directory, json
    /// output has one report object per line.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Do not display progress bars and messages
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        Args::parse().check()
    }

    /// Check CLI arguments for basic sanity
    fn check(self) -> Result<Self> {
        anyhow::ensure!(
            !self.root.as_os_str().is_empty(),
            "the source root directory must not be empty"
        );
        anyhow::ensure!(
            !self.extension.trim_start_matches('.').is_empty(),
            "the source file extension must not be empty"
        );
        for name in self.exclude.iter() {
            anyhow::ensure!(
                !name.is_empty() && !name.contains(['/', '\\']),
                "excluded directory {name:?} should be a single directory name"
            );
        }
        Ok(self)
    }

    /// Window size, taking the mode-specific default into account
    pub fn window(&self) -> NonZeroUsize {
        self.window.unwrap_or(self.mode.default_window())
    }
}
//
fn main() -> Result<()> {
    // Set up logging, but don't make it a hard requirement
    if let Err(e) = setup_logging() {
        eprintln!("warning: logging is disabled because syslog is unavailable ({e})");
    }

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let config = Config::new(args);
    log::debug!("Running with {config:#?}");

    // Set up progress reporting
    let report = if config.output.quiet {
        ProgressReport::hidden()
    } else {
        ProgressReport::new(config.output.format == Format::Text)
    };

    // Scan the source tree and report the most frequent ngrams
    let mut reporter = Reporter::new(BufWriter::new(std::io::stdout()), config.output.format);
    let summary = pipeline::run(&config, &report, &mut reporter)?;
    log::info!("Done with {summary:?}");
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Maximal run of word characters from a source file, or whitespace-separated
/// word in word mode
pub type Token = Box<str>;

/// Ordered sequence of consecutive tokens
pub type Ngram = Box<[Token]>;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
