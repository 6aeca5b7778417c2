//! Command-line arguments and the conversion configuration built from them.

use std::path::PathBuf;

/// Default output directory.
pub const DEFAULT_OUTPUT: &str = "generated";

/// Default Java package.
pub const DEFAULT_PACKAGE: &str = "generated";

/// Arguments shared by every converter binary.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the input `.owl` ontology.
    pub ontology: PathBuf,

    /// Directory that receives the versioned artifact folder.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Override the ontology's `owl:versionInfo`.
    #[arg(long)]
    pub version: Option<String>,

    /// Previous ontology version; enables migration artifacts.
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Folder name prefix used instead of the ontology file name.
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Everything one conversion run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Input ontology.
    pub ontology: PathBuf,
    /// Output root.
    pub output: PathBuf,
    /// Version override.
    pub version: Option<String>,
    /// Previous ontology version, if migration artifacts are wanted.
    pub previous: Option<PathBuf>,
    /// Folder name prefix.
    pub prefix: Option<String>,
}

impl ConversionConfig {
    /// Converts `ontology` into the default output directory.
    pub fn new(ontology: impl Into<PathBuf>) -> Self {
        Self {
            ontology: ontology.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            version: None,
            previous: None,
            prefix: None,
        }
    }

    /// Sets the output root.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Overrides the ontology version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Diffs against a previous ontology version.
    #[must_use]
    pub fn with_previous(mut self, previous: impl Into<PathBuf>) -> Self {
        self.previous = Some(previous.into());
        self
    }

    /// Sets the folder name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Name the output folder is derived from when no prefix is set: the
    /// ontology file name without its extension.
    #[must_use]
    pub fn base_name(&self) -> String {
        self.ontology
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ontology".to_string())
    }
}

impl From<&ConvertArgs> for ConversionConfig {
    fn from(args: &ConvertArgs) -> Self {
        Self {
            ontology: args.ontology.clone(),
            output: args.output.clone(),
            version: args.version.clone(),
            previous: args.previous.clone(),
            prefix: args.prefix.clone(),
        }
    }
}
