//! Ontology model code generator.
//!
//! Lowers a [`SchemaModel`] into a small intermediate representation and
//! renders it as Python dataclasses, Java classes or a C++ header. When a
//! [`MigrationRuleSet`] is supplied, each target also gets a migration
//! adapter with the rules embedded as data, plus a `CHANGES.md` guide.
//!
//! Rendering is pure: [`CodeEmitter::render`] returns [`Artifact`]s and
//! never touches the filesystem. [`CodeEmitter::emit`] renders and writes
//! into a layout planned by [`VersionDirectoryPlanner`].

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod changelog;
pub mod cpp;
pub mod emit;
pub mod error;
pub mod history;
pub mod ir;
pub mod java;
pub mod mapping;
pub mod planner;
pub mod python;
pub mod writer;

use std::path::PathBuf;

use owlgen_evolution::MigrationRuleSet;
use owlgen_schema::SchemaModel;
use tracing::info;

pub use error::{EmissionError, HistoryError};
pub use history::{OntologyHistory, VersionStep};
pub use ir::{ClassIr, FieldIr, FieldKind, ModelIr};
pub use mapping::Target;
pub use planner::{OutputLayout, VersionDirectoryPlanner};

/// One rendered file, relative to the artifact root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the artifact root.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

impl Artifact {
    /// Creates an artifact.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of classes emitted.
    pub class_count: usize,
    /// Number of fields emitted across all classes.
    pub field_count: usize,
    /// Whether migration artifacts were emitted.
    pub with_migration: bool,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
}

/// Renders models for one target.
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    target: Target,
    artifact_name: String,
}

impl CodeEmitter {
    /// Creates an emitter. `artifact_name` names the Java build artifact and
    /// is otherwise unused.
    pub fn new(target: Target, artifact_name: impl Into<String>) -> Self {
        Self {
            target,
            artifact_name: artifact_name.into(),
        }
    }

    /// The target language.
    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Renders every artifact for `model`, with migration artifacts when
    /// `rules` is given. Paths are relative to the artifact root.
    ///
    /// # Errors
    ///
    /// Returns [`EmissionError::Rules`] if the rule set cannot be embedded.
    pub fn render(
        &self,
        model: &SchemaModel,
        rules: Option<&MigrationRuleSet>,
    ) -> Result<Vec<Artifact>, EmissionError> {
        self.render_ir(&ModelIr::build(model), rules)
    }

    fn render_ir(
        &self,
        ir: &ModelIr,
        rules: Option<&MigrationRuleSet>,
    ) -> Result<Vec<Artifact>, EmissionError> {
        let source_root = self.target.source_root();
        let mut artifacts = match &self.target {
            Target::Python => python::render(ir, rules, &source_root)?,
            Target::Java { package } => {
                java::render(ir, rules, package, &self.artifact_name, &source_root)
            }
            Target::Cpp => cpp::render(ir, rules, &source_root),
        };
        if let Some(rules) = rules {
            artifacts.push(Artifact::new(
                changelog::CHANGELOG_FILE,
                changelog::render(rules),
            ));
        }
        Ok(artifacts)
    }

    /// Renders and writes into `layout`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or any directory or file cannot be
    /// written. Files written before the failure are kept.
    pub fn emit(
        &self,
        layout: &OutputLayout,
        model: &SchemaModel,
        rules: Option<&MigrationRuleSet>,
    ) -> Result<GenerationReport, EmissionError> {
        let ir = ModelIr::build(model);
        let artifacts = self.render_ir(&ir, rules)?;
        layout.prepare()?;
        let files = writer::write_artifacts(&layout.artifact_root, &artifacts)?;
        info!(
            target_lang = %self.target,
            root = %layout.artifact_root.display(),
            files = files.len(),
            "generation complete"
        );
        Ok(GenerationReport {
            class_count: ir.classes.len(),
            field_count: ir.field_count(),
            with_migration: rules.is_some(),
            files,
        })
    }
}
