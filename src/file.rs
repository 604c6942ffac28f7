//! Loading of an individual source file

use crate::Result;
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Source file whose text has been loaded in memory
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileRecord {
    /// Location of the file
    pub path: PathBuf,

    /// Raw text of the file
    pub text: String,
}

/// Load the whole text of a source file
///
/// No attempt is made at isolating methods or any other syntactic construct:
/// the text of the entire file goes through the rest of the pipeline. Files
/// which are not valid UTF-8 are rejected.
pub fn load_file_text(path: &Path) -> Result<FileRecord> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("decoding {} as UTF-8", path.display()))?;
    log::trace!("Loaded {} bytes of text from {}", text.len(), path.display());
    Ok(FileRecord {
        path: path.to_owned(),
        text,
    })
}
