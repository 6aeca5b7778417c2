//! Writes rendered artifacts to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::EmissionError;
use crate::Artifact;

/// Writes a text file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be
/// written.
pub fn write_text(path: &Path, content: &str) -> Result<(), EmissionError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| EmissionError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| EmissionError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}

/// Writes every artifact under `root` and returns the paths written, in
/// order. Stops at the first failure; files already written are kept.
///
/// # Errors
///
/// Returns the first write failure.
pub fn write_artifacts(root: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, EmissionError> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = root.join(&artifact.path);
        write_text(&path, &artifact.contents)?;
        written.push(path);
    }
    Ok(written)
}
