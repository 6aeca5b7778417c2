//! Versioned output directory layout.
//!
//! Every generation run writes into `{output}/{name}_v{version}` where dots
//! in the version become underscores, so several versions of one ontology
//! can sit side by side.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::EmissionError;
use crate::mapping::Target;

/// Separates the name from the version in a directory name.
pub const VERSION_MARKER: &str = "_v";

/// Plans artifact directories under one output root.
#[derive(Debug, Clone)]
pub struct VersionDirectoryPlanner {
    output_root: PathBuf,
}

/// Where one generation run writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Name before the version suffix: the prefix, else the ontology name.
    pub artifact_name: String,
    /// `{output}/{artifact_name}_v{version}`.
    pub artifact_root: PathBuf,
    /// Target-specific source directory inside the artifact root.
    pub source_root: PathBuf,
}

impl VersionDirectoryPlanner {
    /// Plans under `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// The output root.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Returns `{prefix-or-base}_v{version}` with `.` replaced by `_`.
    /// An empty prefix counts as absent.
    #[must_use]
    pub fn directory_name(base_name: &str, prefix: Option<&str>, version: &str) -> String {
        let name = prefix.filter(|p| !p.is_empty()).unwrap_or(base_name);
        format!("{name}{VERSION_MARKER}{}", version.replace('.', "_"))
    }

    /// Computes the layout. Touches nothing on disk.
    #[must_use]
    pub fn plan(
        &self,
        base_name: &str,
        prefix: Option<&str>,
        version: &str,
        target: &Target,
    ) -> OutputLayout {
        let artifact_name = prefix.filter(|p| !p.is_empty()).unwrap_or(base_name);
        let artifact_root = self
            .output_root
            .join(Self::directory_name(base_name, prefix, version));
        OutputLayout {
            artifact_name: artifact_name.to_string(),
            source_root: artifact_root.join(target.source_root()),
            artifact_root,
        }
    }
}

impl OutputLayout {
    /// Creates the artifact and source directories. Existing directories are
    /// left as they are, so repeated calls are harmless.
    ///
    /// # Errors
    ///
    /// Returns [`EmissionError::CreateDir`] if a directory cannot be created.
    pub fn prepare(&self) -> Result<(), EmissionError> {
        for dir in [&self.artifact_root, &self.source_root] {
            fs::create_dir_all(dir).map_err(|source| EmissionError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        debug!(root = %self.artifact_root.display(), "prepared output directories");
        Ok(())
    }
}
