//! Display of ngram rankings

use crate::{config::ModelConfig, top::RankedNgram, Result, Token};
use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use std::{io::Write, path::Path};

/// Report format
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ValueEnum)]
pub enum Format {
    /// Human-readable text, one ngram per line
    Text,

    /// Comma-separated values with a header line
    Csv,

    /// One JSON object per report
    Json,
}

/// What a ranking was computed from
#[derive(Clone, Copy, Debug)]
pub struct RankingScope<'a> {
    /// Directory whose source files were scanned
    pub path: &'a Path,

    /// Truth that subdirectories were scanned too
    pub recursive: bool,

    /// How ngrams were built
    pub model: ModelConfig,

    /// Total number of ngram windows
    pub total: usize,

    /// Number of distinct ngrams
    pub distinct: usize,
}

/// Writer of ngram ranking reports
#[derive(Debug)]
pub struct Reporter<W: Write> {
    /// Destination of reports
    out: W,

    /// Report format
    format: Format,

    /// Truth that a CSV header line has already been written
    wrote_csv_header: bool,
}
//
impl<W: Write> Reporter<W> {
    /// Prepare to write reports in a certain format
    pub fn new(out: W, format: Format) -> Self {
        Self {
            out,
            format,
            wrote_csv_header: false,
        }
    }

    /// Write a report about a slice of an ngram ranking
    ///
    /// Output is flushed at the end of each report, so that consecutive reports
    /// show up as soon as they are ready.
    pub fn write(&mut self, scope: &RankingScope, entries: &[RankedNgram]) -> Result<()> {
        match self.format {
            Format::Text => self.write_text(scope, entries),
            Format::Csv => self.write_csv(scope, entries),
            Format::Json => self.write_json(scope, entries),
        }
        .context("writing ngram report")?;
        self.out.flush().context("flushing ngram report")
    }

    /// Get back the underlying writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Human-readable report
    fn write_text(&mut self, scope: &RankingScope, entries: &[RankedNgram]) -> Result<()> {
        let ModelConfig { mode, window } = scope.model;
        let what = if scope.recursive { "below" } else { "in" };
        match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => writeln!(
                self.out,
                "{mode:?} {window}-grams #{}-{} {what} {} ({} distinct, {} total):",
                first.rank + 1,
                last.rank + 1,
                scope.path.display(),
                scope.distinct,
                scope.total,
            )?,
            _ => writeln!(
                self.out,
                "No {mode:?} {window}-gram in the requested ranks {what} {} ({} distinct, {} total)",
                scope.path.display(),
                scope.distinct,
                scope.total,
            )?,
        }
        for entry in entries {
            writeln!(self.out, "{} : {}", entry.ngram.join(" "), entry.count)?;
        }
        Ok(())
    }

    /// Machine-readable tabular report
    fn write_csv(&mut self, scope: &RankingScope, entries: &[RankedNgram]) -> Result<()> {
        /// Row of the CSV report
        #[derive(Serialize)]
        struct Row<'a> {
            scope: &'a str,
            rank: usize,
            ngram: &'a str,
            count: usize,
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(!self.wrote_csv_header)
            .from_writer(&mut self.out);
        let scope_path = scope.path.to_string_lossy();
        for entry in entries {
            writer.serialize(Row {
                scope: &scope_path,
                rank: entry.rank + 1,
                ngram: &entry.ngram.join(" "),
                count: entry.count,
            })?;
            self.wrote_csv_header = true;
        }
        writer.flush()?;
        Ok(())
    }

    /// Machine-readable structured report
    fn write_json(&mut self, scope: &RankingScope, entries: &[RankedNgram]) -> Result<()> {
        /// Ranked ngram from the JSON report
        #[derive(Serialize)]
        struct Entry<'a> {
            rank: usize,
            ngram: &'a [Token],
            count: usize,
        }
        /// JSON report
        #[derive(Serialize)]
        struct Report<'a> {
            scope: &'a str,
            recursive: bool,
            #[serde(flatten)]
            model: ModelConfig,
            total: usize,
            distinct: usize,
            entries: Vec<Entry<'a>>,
        }
        let scope_path = scope.path.to_string_lossy();
        let report = Report {
            scope: &scope_path,
            recursive: scope.recursive,
            model: scope.model,
            total: scope.total,
            distinct: scope.distinct,
            entries: (entries.iter())
                .map(|entry| Entry {
                    rank: entry.rank + 1,
                    ngram: entry.ngram,
                    count: entry.count,
                })
                .collect(),
        };
        serde_json::to_writer(&mut self.out, &report)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ngram::Mode, stats::FrequencyTable, top};
    use std::num::NonZeroUsize;

    fn table() -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for ngram in [["public", "static"], ["static", "void"], ["public", "static"]] {
            table.add(&ngram.map(Token::from));
        }
        table
    }

    fn scope(table: &FrequencyTable) -> RankingScope<'static> {
        RankingScope {
            path: Path::new("proj"),
            recursive: true,
            model: ModelConfig {
                mode: Mode::Tokens,
                window: NonZeroUsize::new(2).unwrap(),
            },
            total: table.total(),
            distinct: table.len(),
        }
    }

    fn render(format: Format, reports: usize) -> String {
        let table = table();
        let mut reporter = Reporter::new(Vec::new(), format);
        for _ in 0..reports {
            reporter.write(&scope(&table), &top::top(&table, 10)).unwrap();
        }
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn text_report_lists_tokens_and_counts() {
        assert_eq!(
            render(Format::Text, 1),
            "Tokens 2-grams #1-2 below proj (2 distinct, 3 total):\n\
             public static : 2\n\
             static void : 1\n"
        );
    }

    #[test]
    fn text_report_mentions_empty_slices() {
        let table = table();
        let mut reporter = Reporter::new(Vec::new(), Format::Text);
        let slice = top::ranked(&table, top::RankWindow::DEBUG_SLICE);
        reporter.write(&scope(&table), &slice).unwrap();
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.starts_with("No Tokens 2-gram in the requested ranks"));
    }

    #[test]
    fn csv_header_is_only_written_once() {
        assert_eq!(
            render(Format::Csv, 2),
            "scope,rank,ngram,count\n\
             proj,1,public static,2\n\
             proj,2,static void,1\n\
             proj,1,public static,2\n\
             proj,2,static void,1\n"
        );
    }

    #[test]
    fn json_reports_are_one_object_per_line() {
        let output = render(Format::Json, 2);
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        let report: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(report["scope"], "proj");
        assert_eq!(report["mode"], "tokens");
        assert_eq!(report["window"], 2);
        assert_eq!(report["total"], 3);
        assert_eq!(report["distinct"], 2);
        assert_eq!(report["entries"][0]["rank"], 1);
        assert_eq!(report["entries"][0]["ngram"], serde_json::json!(["public", "static"]));
        assert_eq!(report["entries"][1]["count"], 1);
    }
}
