//! Discovery of source files below a root directory

use crate::{config::ScanConfig, Result};
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Names of the directories that are not scanned by default
///
/// These hold documentation, build scripts, build products and tests, none of
/// which is representative of how the main sources are written.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &["docs", "gradle", "SPD-classes", "build", "bin", "out", "test"];

/// Directory from the source tree, along with the source files directly
/// inside of it
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceDir {
    /// Location of the directory
    pub path: PathBuf,

    /// Source files from this directory, sorted by name
    pub files: Box<[SourceFile]>,
}
//
impl SourceDir {
    /// Total size of the source files from this directory, in bytes
    pub fn total_len(&self) -> u64 {
        self.files.iter().map(|file| file.len).sum()
    }
}

/// Source file from a [`SourceDir`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceFile {
    /// Location of the file
    pub path: PathBuf,

    /// Size of the file at the time where it was discovered, in bytes
    pub len: u64,
}

/// Enumerate the directories of a source tree, depth first
///
/// Excluded directories are skipped along with everything inside of them, but
/// the root directory is always scanned. Directory entries are visited in
/// order of increasing file name, so walking an unchanged tree twice yields the
/// same sequence.
///
/// The root directory is checked right away, while other I/O errors are
/// reported lazily, as the iterator reaches the problematic directory.
pub fn source_dirs(config: &ScanConfig) -> Result<impl Iterator<Item = Result<SourceDir>> + '_> {
    // Make sure that the root directory is there
    let root = &config.root;
    let metadata =
        fs::metadata(root).with_context(|| format!("accessing source root {}", root.display()))?;
    anyhow::ensure!(
        metadata.is_dir(),
        "source root {} is not a directory",
        root.display()
    );

    // Walk the tree, pruning excluded directories
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            let excluded = entry.depth() > 0
                && entry.file_type().is_dir()
                && config.is_excluded_dir(entry.path());
            if excluded {
                log::debug!("Skipping excluded directory {}", entry.path().display());
            }
            !excluded
        });

    // List the source files of each directory that we go through
    Ok(walker.filter_map(move |entry| {
        let entry = match entry.context("walking the source tree") {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e)),
        };
        entry
            .file_type()
            .is_dir()
            .then(|| list_source_files(config, entry.path()))
    }))
}

/// List the source files directly inside of a directory
fn list_source_files(config: &ScanConfig, dir: &Path) -> Result<SourceDir> {
    let context = || format!("listing the contents of {}", dir.display());
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(context)? {
        let entry = entry.with_context(context)?;
        if !config.is_source_file(&entry.file_name()) {
            continue;
        }

        // Symlinks are followed, so that linked source files are counted too
        let path = entry.path();
        let metadata = fs::metadata(&path)
            .with_context(|| format!("querying the metadata of {}", path.display()))?;
        if !metadata.is_file() {
            continue;
        }
        files.push(SourceFile {
            path,
            len: metadata.len(),
        });
    }
    files.sort_unstable_by(|a, b| a.path.cmp(&b.path));
    log::trace!("Found {} source file(s) in {}", files.len(), dir.display());
    Ok(SourceDir {
        path: dir.to_owned(),
        files: files.into(),
    })
}
