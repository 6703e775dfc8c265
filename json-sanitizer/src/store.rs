//! Loading and persisting documents.
//!
//! Saves go through a temporary file in the target's directory that replaces
//! the target in one rename, so a failed write never clobbers the output of an
//! earlier pass.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{
    error::{Result, SanitizeError},
    render,
};

/// Reads and parses the whole document at `path`.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SanitizeError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SanitizeError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Writes `tree` as pretty JSON (two-space indent, key order preserved).
pub fn save_document(path: impl AsRef<Path>, tree: &Value) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(tree).map_err(SanitizeError::Serialize)?;
    bytes.push(b'\n');
    write_atomically(path.as_ref(), &bytes)
}

/// Writes the Markdown rendering of `tree`.
pub fn save_markdown(path: impl AsRef<Path>, tree: &Value) -> Result<()> {
    write_atomically(path.as_ref(), render::to_markdown(tree).as_bytes())
}

/// `<stem>_sanitized.<extension>` next to `input`.
pub fn sibling_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |stem| stem.to_string_lossy());
    input.with_file_name(format!("{stem}_sanitized.{extension}"))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source| SanitizeError::Write {
        path: path.to_owned(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved");
    Ok(())
}
