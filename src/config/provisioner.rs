use crate::error::{AnetaError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Makes sure each directory exists, creating missing parents in order.
/// Existing directories are left untouched, so repeated calls are no-ops.
pub fn ensure_directories<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    for path in paths {
        ensure_directory(path.as_ref())?;
    }
    Ok(())
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        log::trace!("Directory already present: {}", path.display());
        return Ok(());
    }
    if path.exists() {
        return Err(creation_error(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
        ));
    }

    fs::create_dir_all(path).map_err(|e| creation_error(path, e))?;
    log::debug!("Created directory {}", path.display());
    Ok(())
}

fn creation_error(path: &Path, source: io::Error) -> AnetaError {
    AnetaError::DirectoryCreation {
        path: PathBuf::from(path),
        source,
    }
}
