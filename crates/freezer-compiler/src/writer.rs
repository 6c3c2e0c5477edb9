//! Idempotent artifact writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file already held exactly this content and was not touched.
    Unchanged,
    Written,
}

/// Write `content` to `path` unless the file already holds it byte for byte.
///
/// The new content goes to a temporary file in the destination directory,
/// which is then renamed over `path`, so readers never see a partial file.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<WriteOutcome> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    match fs::read(path) {
        Ok(existing) if existing == content => return Ok(WriteOutcome::Unchanged),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(io_error(err)),
    }

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
    tmp.write_all(content).map_err(io_error)?;
    tmp.as_file().sync_all().map_err(io_error)?;
    tmp.persist(path).map_err(|err| io_error(err.error))?;

    Ok(WriteOutcome::Written)
}
