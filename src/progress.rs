//! Progress reporting infrastructure

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::{borrow::Cow, cell::Cell};

/// CLI progress report of ongoing operations
///
/// To avoid corrupted terminal output, you should not write anything to stdout
/// or stderr yourself while progress bars are displayed. Please use
/// [`stage()`](Self::stage) and [`warn()`](Self::warn), or logs for debug
/// messages.
#[derive(Clone, Debug)]
pub struct ProgressReport {
    /// Progress bars
    bars: MultiProgress,

    /// Truth that processing stages should be announced on stdout
    announce_stages: bool,
}
//
impl ProgressReport {
    /// Prepare to report progress on the cli
    pub fn new(announce_stages: bool) -> Self {
        Self {
            bars: MultiProgress::new(),
            announce_stages,
        }
    }

    /// Don't display anything besides warnings
    pub fn hidden() -> Self {
        Self {
            bars: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            announce_stages: false,
        }
    }

    /// Announce that a new processing stage is starting
    pub fn stage(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::info!("{message}");
        if self.announce_stages {
            self.bars.suspend(|| println!("{message}"));
        }
    }

    /// Warn about a problem that does not prevent processing from going on
    pub fn warn(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::warn!("{message}");
        self.bars.suspend(|| eprintln!("warning: {message}"));
    }

    /// Run code that writes to stdout or stderr with progress bars out of the way
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bars.suspend(f)
    }

    /// Prepare to report on a new operation
    pub fn add(
        &self,
        what: impl Into<Cow<'static, str>>,
        config: ProgressConfig,
    ) -> ProgressTracker {
        let what = what.into();
        let ProgressConfig {
            initial_work,
            show_rate_eta,
            can_add_work,
        } = config;
        let mut bar = ProgressBar::new(initial_work.into()).with_prefix(what);
        let style_header = "{prefix} {wide_bar} ";
        let style_trailer = match (initial_work, show_rate_eta) {
            (Work::Steps(_), false) => "{pos}/{len}",
            (Work::Steps(_), true) => "{pos}/{len} ({per_sec})",
            (Work::Bytes(_), false) => "{decimal_bytes}/{decimal_total_bytes}",
            (Work::Bytes(_), true) => {
                "{decimal_bytes}/{decimal_total_bytes} ({decimal_bytes_per_sec})"
            }
        };
        bar = bar.with_style(
            ProgressStyle::with_template(&format!("{style_header}{style_trailer}"))
                .expect("all styles above should be valid indicatif styles"),
        );
        let added = u64::from(initial_work) > 0;
        if added {
            self.bars.add(bar.clone());
        }
        ProgressTracker {
            bar,
            report: self.bars.clone(),
            added: Cell::new(added),
            upcoming: Cell::new(can_add_work),
        }
    }
}

/// Progress bar configuration
///
/// You will normally want to override at least one of `initial_work` and
/// `can_add_work` from the default.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct ProgressConfig {
    /// Initial length of the progress bar
    initial_work: Work,

    /// Show the completion rate
    show_rate_eta: bool,

    /// Can add more work after initial configuration
    can_add_work: bool,
}
//
impl ProgressConfig {
    /// Default configuration, with some initial amount of work
    pub fn new(initial_work: Work) -> Self {
        Self {
            initial_work,
            show_rate_eta: true,
            can_add_work: false,
        }
    }

    /// Disable display of the completion rate
    pub fn dont_show_rate_eta(self) -> Self {
        Self {
            show_rate_eta: false,
            ..self
        }
    }

    /// Enable addition of work after initial configuration
    pub fn allow_adding_work(self) -> Self {
        Self {
            can_add_work: true,
            ..self
        }
    }
}

/// Work whose progression can be tracked
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Work {
    /// Steps to be taken, with a precise count display
    Steps(usize),

    /// Bytes to be processed
    Bytes(u64),
}
//
impl From<Work> for u64 {
    fn from(value: Work) -> Self {
        match value {
            Work::Steps(s) => s as u64,
            Work::Bytes(b) => b,
        }
    }
}

/// Mechanism to track progress
#[derive(Debug)]
pub struct ProgressTracker {
    /// Progress bar for this specific process
    bar: ProgressBar,

    /// Underlying process report
    report: MultiProgress,

    /// Truth that the progress bar has already been added to the report
    added: Cell<bool>,

    /// Truth that more work can still be added to this progress bar
    upcoming: Cell<bool>,
}
//
impl ProgressTracker {
    /// Show that a certain amount of progress has been made
    ///
    /// Returns truth that the progress bar has reached its maximum value
    pub fn make_progress(&self, progress: u64) -> bool {
        // Track progress
        self.bar.inc(progress);
        let current = self.bar.position();
        let max = self.bar.length().unwrap_or(0);
        assert!(current <= max, "recorded more progress than expected");

        // Hide progress bar once done
        let finished = current == max && !self.upcoming.get();
        if finished {
            self.hide();
        }
        finished
    }

    /// Increment the amount of progress that remains to be done
    ///
    /// Note that this operation is disabled by default, and you must enable it
    /// in [`ProgressConfig`]. If you use it, call `done_adding_work()` once you
    /// know no further work will be coming.
    pub fn add_work(&self, remaining: u64) {
        assert!(
            self.upcoming.get(),
            "should not add work after done_adding_work"
        );
        if !self.added.get() && remaining > 0 {
            self.added.set(true);
            self.report.add(self.bar.clone());
        }
        self.bar.inc_length(remaining);
    }

    /// Promise that add_work will not be called anymore
    ///
    /// This allows for the progress bar to be hidden once full.
    pub fn done_adding_work(&self) {
        assert!(
            self.upcoming.replace(false),
            "should only need to stop adding work once"
        );
        if self.bar.position() == self.bar.length().unwrap_or(0) {
            self.hide();
        }
    }

    /// Truth that the progress bar has been finished and hidden
    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    /// Remove the progress bar from the display
    fn hide(&self) {
        self.bar.finish_and_clear();
        if self.added.replace(false) {
            self.report.remove(&self.bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_work_is_tracked() {
        let report = ProgressReport::hidden();
        let files = report.add(
            "Scanning",
            ProgressConfig::new(Work::Steps(0)).allow_adding_work(),
        );
        files.add_work(2);
        assert!(!files.make_progress(1));
        assert!(!files.make_progress(1));
        files.add_work(1);
        assert!(!files.make_progress(1));
        files.done_adding_work();
        assert!(files.is_finished());
    }

    #[test]
    fn fixed_work_finishes_on_last_step() {
        let report = ProgressReport::hidden();
        let bytes = report.add("Loading", ProgressConfig::new(Work::Bytes(10)).dont_show_rate_eta());
        assert!(!bytes.make_progress(4));
        assert!(bytes.make_progress(6));
    }

    #[test]
    #[should_panic]
    fn adding_work_requires_opt_in() {
        let report = ProgressReport::hidden();
        report
            .add("Scanning", ProgressConfig::new(Work::Steps(1)))
            .add_work(1);
    }
}
