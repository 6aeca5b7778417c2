//! One conversion run: validate, parse, extract, diff, emit.

use std::path::Path;

use owlgen_codegen::{CodeEmitter, GenerationReport, OutputLayout, Target, VersionDirectoryPlanner};
use owlgen_evolution::{Delta, MigrationRuleSet};
use owlgen_schema::{OntologyGraph, SchemaExtractor, SchemaModel};
use tracing::{info, warn};

use crate::config::ConversionConfig;
use crate::error::PipelineError;

/// The only accepted input extension.
pub const ONTOLOGY_EXTENSION: &str = "owl";

/// What happened to the migration artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStatus {
    /// No previous version was given.
    NotRequested,
    /// Rules were synthesized from the given previous version.
    Generated {
        /// Version of the previous ontology.
        from_version: String,
    },
    /// The previous version was missing or unreadable; only the model was
    /// generated.
    Skipped {
        /// Why the previous version was not used.
        reason: String,
    },
}

/// Result of a successful conversion.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Where the artifacts were written.
    pub layout: OutputLayout,
    /// Version the model was generated for.
    pub version: String,
    /// Migration artifact status.
    pub migration: MigrationStatus,
    /// Counts and files written.
    pub report: GenerationReport,
}

impl ConversionOutcome {
    /// The versioned artifact directory.
    #[must_use]
    pub fn artifact_root(&self) -> &Path {
        &self.layout.artifact_root
    }
}

/// Accepts only existing files with the `.owl` extension.
///
/// # Errors
///
/// Returns [`PipelineError::Validation`] otherwise.
pub fn validate(path: &Path) -> Result<(), PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::Validation {
            path: path.to_path_buf(),
            reason: "file not found",
        });
    }
    let is_owl = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ONTOLOGY_EXTENSION));
    if !is_owl {
        return Err(PipelineError::Validation {
            path: path.to_path_buf(),
            reason: "only .owl files are supported",
        });
    }
    Ok(())
}

/// Runs a full conversion for `target`.
///
/// # Errors
///
/// Fails on an invalid, unparsable or unreadable input ontology, or when the
/// artifacts cannot be written. Problems with the previous version are not
/// errors: they are logged and reported as [`MigrationStatus::Skipped`].
pub fn convert(config: &ConversionConfig, target: Target) -> Result<ConversionOutcome, PipelineError> {
    validate(&config.ontology)?;
    let graph = OntologyGraph::load(&config.ontology)?;
    let model = SchemaExtractor::new(&graph).extract(config.version.as_deref())?;
    info!(
        ontology = %config.ontology.display(),
        version = model.version(),
        classes = model.class_count(),
        properties = model.property_count(),
        "schema extracted"
    );

    let (rules, migration) = match &config.previous {
        None => (None, MigrationStatus::NotRequested),
        Some(previous) => match load_previous(previous) {
            Ok(old) => {
                let delta = Delta::compute(&old, &model);
                info!(
                    from = %delta.from_version,
                    to = %delta.to_version,
                    changes = delta.change_count(),
                    "schema diffed"
                );
                let rules = MigrationRuleSet::synthesize(&delta, &model);
                let from_version = rules.from_version.clone();
                (Some(rules), MigrationStatus::Generated { from_version })
            }
            Err(err) => {
                warn!(
                    previous = %previous.display(),
                    error = %err,
                    "previous version unusable, skipping migration artifacts"
                );
                let reason = err.to_string();
                (None, MigrationStatus::Skipped { reason })
            }
        },
    };

    let layout = VersionDirectoryPlanner::new(&config.output).plan(
        &config.base_name(),
        config.prefix.as_deref(),
        model.version(),
        &target,
    );
    let emitter = CodeEmitter::new(target, layout.artifact_name.clone());
    let report = emitter.emit(&layout, &model, rules.as_ref())?;

    Ok(ConversionOutcome {
        version: model.version().to_string(),
        layout,
        migration,
        report,
    })
}

fn load_previous(path: &Path) -> Result<SchemaModel, PipelineError> {
    if !path.is_file() {
        return Err(PipelineError::Validation {
            path: path.to_path_buf(),
            reason: "file not found",
        });
    }
    let graph = OntologyGraph::load(path)?;
    Ok(SchemaExtractor::new(&graph).extract(None)?)
}
