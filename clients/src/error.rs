//! Pipeline errors.

use std::path::PathBuf;

use owlgen_codegen::EmissionError;
use owlgen_schema::{ParseError, SchemaExtractionError};
use thiserror::Error;

/// A conversion run failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input path was rejected before parsing.
    #[error("invalid input {}: {reason}", path.display())]
    Validation {
        /// Offending path.
        path: PathBuf,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The ontology could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The parsed graph could not be read as a schema.
    #[error(transparent)]
    SchemaExtraction(#[from] SchemaExtractionError),
    /// Writing the generated artifacts failed.
    #[error(transparent)]
    Emission(#[from] EmissionError),
}
