//! Source tree scanning pipeline
//!
//! Every source file goes through loading, splitting into words or tokens and
//! ngram extraction before being folded into a [`FrequencyTable`], one file at
//! a time. The table is only ranked once the whole tree has been scanned.

use crate::{
    config::{Config, ModelConfig},
    file,
    ngram,
    progress::{ProgressConfig, ProgressReport, ProgressTracker, Work},
    report::{RankingScope, Reporter},
    stats::FrequencyTable,
    top::{self, RankWindow, RankedNgram},
    walk::{self, SourceDir},
    Result,
};
use std::{io::Write, ops::ControlFlow, path::Path};

/// What was seen during a scan
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ScanSummary {
    /// Number of directories that were scanned
    pub directories: usize,

    /// Number of source files whose ngrams were counted
    pub files: usize,

    /// Number of source files that could not be read
    pub skipped_files: usize,

    /// Number of ngram windows that were counted
    pub windows: usize,
}

/// Scan the source tree, then report the most frequent ngrams
///
/// In per-directory mode, the ngrams of each directory are also reported as
/// soon as that directory has been scanned. Asking to stop after the first
/// directory skips the rest of the tree, including the final report.
pub fn run<W: Write>(
    config: &Config,
    report: &ProgressReport,
    reporter: &mut Reporter<W>,
) -> Result<ScanSummary> {
    // Build the frequency table
    report.stage(format!(
        "Scanning source files below {}...",
        config.scan.root.display()
    ));
    let mut corpus = FrequencyTable::new();
    let summary = if config.output.per_directory {
        let progress = ScanProgress::new(report);
        match scan_per_directory(config, &mut corpus, report, &progress, reporter)? {
            ControlFlow::Continue(summary) => summary,
            ControlFlow::Break(summary) => {
                report.stage("Stopped after the first directory, the rest of the tree was not scanned");
                return Ok(summary);
            }
        }
    } else {
        scan(config, &mut corpus, report)?
    };
    let ModelConfig { mode, window } = config.model;
    report.stage(format!(
        "Extracted {} {mode:?} {window}-grams from {} source files in {} directories",
        summary.windows, summary.files, summary.directories
    ));
    if summary.skipped_files > 0 {
        report.warn(format!("{} source files were skipped", summary.skipped_files));
    }

    // Report the most frequent ngrams
    report.stage("Ranking n-grams...");
    let ranking = rank(&corpus, config.output.ranks);
    report.suspend(|| reporter.write(&scope(config, &config.scan.root, true, &corpus), &ranking))?;
    Ok(summary)
}

/// Fold every source file below the root directory into a frequency table
pub fn scan(
    config: &Config,
    table: &mut FrequencyTable,
    report: &ProgressReport,
) -> Result<ScanSummary> {
    let progress = ScanProgress::new(report);
    let mut summary = ScanSummary::default();
    for dir in walk::source_dirs(&config.scan)? {
        let dir = dir?;
        progress.add_dir(&dir);
        scan_dir(config, &dir, table, &mut summary, report, &progress)?;
    }
    progress.finish();
    Ok(summary)
}

/// Like [`scan()`], but also rank and report the ngrams of each directory
///
/// Returns [`ControlFlow::Break`] if scanning stopped after the first
/// directory, in which case `corpus` is left empty. Progress bars are done
/// either way.
fn scan_per_directory<W: Write>(
    config: &Config,
    corpus: &mut FrequencyTable,
    report: &ProgressReport,
    progress: &ScanProgress,
    reporter: &mut Reporter<W>,
) -> Result<ControlFlow<ScanSummary, ScanSummary>> {
    let mut summary = ScanSummary::default();
    for dir in walk::source_dirs(&config.scan)? {
        // Collect the statistics of this directory
        let dir = dir?;
        progress.add_dir(&dir);
        let mut table = FrequencyTable::new();
        scan_dir(config, &dir, &mut table, &mut summary, report, progress)?;
        if table.is_empty() {
            continue;
        }

        // Report them
        let ranking = rank(&table, config.output.ranks);
        report.suspend(|| reporter.write(&scope(config, &dir.path, false, &table), &ranking))?;
        if config.output.stop_after_first {
            progress.finish();
            return Ok(ControlFlow::Break(summary));
        }

        // Integrate them into the statistics of the whole tree
        corpus.merge(table);
    }
    progress.finish();
    Ok(ControlFlow::Continue(summary))
}

/// Fold the source files of a directory into a frequency table
fn scan_dir(
    config: &Config,
    dir: &SourceDir,
    table: &mut FrequencyTable,
    summary: &mut ScanSummary,
    report: &ProgressReport,
    progress: &ScanProgress,
) -> Result<()> {
    summary.directories += 1;
    for source in dir.files.iter() {
        // Load the source file, skipping it if allowed to
        let loaded = file::load_file_text(&source.path);
        progress.files.make_progress(1);
        progress.bytes.make_progress(source.len);
        let record = match loaded {
            Ok(record) => record,
            Err(e) if config.scan.skip_unreadable => {
                report.warn(format!("skipping unreadable source file: {e:#}"));
                summary.skipped_files += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        // Extract ngrams and count them
        let units = config.model.mode.units(&record.text);
        let windows = table.add_all(ngram::windows(&units, config.model.window));
        log::trace!(
            "Counted {windows} ngrams from {} ({} units)",
            record.path.display(),
            units.len()
        );
        summary.files += 1;
        summary.windows += windows;
    }
    Ok(())
}

/// Pick the requested slice of a frequency table's ranking
fn rank(table: &FrequencyTable, ranks: RankWindow) -> Vec<RankedNgram<'_>> {
    if ranks.start == 0 {
        top::top(table, ranks.len)
    } else {
        top::ranked(table, ranks)
    }
}

/// Description of a frequency table for reporting purposes
fn scope<'a>(
    config: &Config,
    path: &'a Path,
    recursive: bool,
    table: &FrequencyTable,
) -> RankingScope<'a> {
    RankingScope {
        path,
        recursive,
        model: config.model,
        total: table.total(),
        distinct: table.len(),
    }
}

/// Progress bars of a source tree scan
struct ScanProgress {
    /// Source files
    files: ProgressTracker,

    /// Bytes of source text
    bytes: ProgressTracker,
}
//
impl ScanProgress {
    /// Set up progress bars, which will grow as directories are discovered
    fn new(report: &ProgressReport) -> Self {
        Self {
            files: report.add(
                "Loading source files",
                ProgressConfig::new(Work::Steps(0))
                    .dont_show_rate_eta()
                    .allow_adding_work(),
            ),
            bytes: report.add(
                "Processing source text",
                ProgressConfig::new(Work::Bytes(0)).allow_adding_work(),
            ),
        }
    }

    /// Account for the files of a newly discovered directory
    fn add_dir(&self, dir: &SourceDir) {
        self.files.add_work(dir.files.len() as u64);
        self.bytes.add_work(dir.total_len());
    }

    /// Promise that no other directory will be discovered
    fn finish(&self) {
        self.files.done_adding_work();
        self.bytes.done_adding_work();
    }
}
