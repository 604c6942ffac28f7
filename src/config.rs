//! Processing pipeline configuration

use crate::{ngram::Mode, report::Format, top::RankWindow, walk, Args};
use serde::Serialize;
use std::{
    ffi::OsStr,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

/// Final process configuration
///
/// This is the result of digesting and validating [`Args`]. Please refer to
/// [`Args`] to know more about individual fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Subset of the configuration that affects which files are loaded
    pub scan: ScanConfig,

    /// Subset of the configuration that affects how ngrams are built
    pub model: ModelConfig,

    /// Subset of the configuration that affects what is reported
    pub output: OutputConfig,
}
//
impl Config {
    /// Determine process configuration from CLI arguments
    pub(crate) fn new(args: Args) -> Self {
        let window = args.window();
        let Args {
            root,
            mode,
            window: _,
            extension,
            exclude,
            top,
            skip,
            debug_slice,
            per_directory,
            stop_after_first,
            skip_unreadable,
            format,
            quiet,
        } = args;
        let mut scan = ScanConfig::new(root).with_extension(&extension);
        if !exclude.is_empty() {
            scan.excluded_dirs = exclude.into();
        }
        scan.skip_unreadable = skip_unreadable;
        Self {
            scan,
            model: ModelConfig { mode, window },
            output: OutputConfig {
                ranks: if debug_slice {
                    RankWindow::DEBUG_SLICE
                } else {
                    RankWindow::new(skip, top)
                },
                format,
                per_directory,
                stop_after_first,
                quiet,
            },
        }
    }
}

/// Subset of the configuration that affects which files are loaded
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanConfig {
    /// Root directory of the source tree
    pub root: PathBuf,

    /// Suffix of source file names, including the leading dot
    pub extension: Box<str>,

    /// Names of the directories that are skipped along with their contents
    pub excluded_dirs: Box<[Box<str>]>,

    /// Truth that unreadable files should be skipped with a warning instead
    /// of aborting the run
    pub skip_unreadable: bool,
}
//
impl ScanConfig {
    /// Default scan configuration for a certain source tree
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: ".java".into(),
            excluded_dirs: (walk::DEFAULT_EXCLUDED_DIRS.iter())
                .map(|&name| name.into())
                .collect(),
            skip_unreadable: false,
        }
    }

    /// Scan files with another extension, with or without the leading dot
    pub fn with_extension(self, extension: &str) -> Self {
        let extension = if extension.starts_with('.') {
            extension.into()
        } else {
            format!(".{extension}").into()
        };
        Self { extension, ..self }
    }

    /// Truth that a directory should be skipped along with its contents
    ///
    /// A directory `<parent>/<name>` is excluded when `<name>` is one of the
    /// excluded names. Names are compared as whole path components, so that
    /// excluding "build" leaves "mybuildtools" alone.
    pub fn is_excluded_dir(&self, dir: &Path) -> bool {
        let Some(name) = dir.file_name() else {
            return false;
        };
        (self.excluded_dirs.iter()).any(|excluded| name == OsStr::new(&**excluded))
    }

    /// Truth that a file name designates a source file
    pub fn is_source_file(&self, file_name: &OsStr) -> bool {
        file_name.to_string_lossy().ends_with(&*self.extension)
    }
}

/// Subset of the configuration that affects how ngrams are built
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct ModelConfig {
    /// What ngrams are made of
    pub mode: Mode,

    /// Number of words or tokens per ngram
    pub window: NonZeroUsize,
}

/// Subset of the configuration that affects what is reported
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutputConfig {
    /// Slice of the ngram ranking that should be displayed
    pub ranks: RankWindow,

    // Other fields have the same meaning as in Args
    pub format: Format,
    pub per_directory: bool,
    pub stop_after_first: bool,
    pub quiet: bool,
}
