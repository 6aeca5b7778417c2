//! Error types for graph loading and schema extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Building a queryable graph from an ontology document failed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document could not be read.
    #[error("failed to read ontology {}: {source}", path.display())]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The document is not valid RDF/XML or Turtle.
    #[error("failed to parse ontology as {syntax}: {message}")]
    Syntax {
        /// Syntax the document was parsed as.
        syntax: &'static str,
        /// Parser message.
        message: String,
    },
}

/// The graph handle could not be iterated while building a schema model.
#[derive(Debug, Error)]
#[error("schema extraction failed: {message}")]
pub struct SchemaExtractionError {
    /// Description of the iteration failure.
    pub message: String,
}

impl SchemaExtractionError {
    /// Wraps any displayable graph error.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
