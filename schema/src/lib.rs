//! Ontology schema model and extractor.
//!
//! Turns a parsed OWL ontology into a [`SchemaModel`]: named classes with at
//! most one parent, object and datatype properties with resolved domains and
//! ranges, and the ontology version.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use owlgen_schema::{OntologyGraph, SchemaExtractor};
//!
//! let graph = OntologyGraph::load(Path::new("university.owl")).expect("parse");
//! let model = SchemaExtractor::new(&graph).extract(None).expect("extract");
//! println!("v{}: {} classes", model.version(), model.class_count());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod extractor;
pub mod graph;
pub mod model;

pub use error::{ParseError, SchemaExtractionError};
pub use extractor::SchemaExtractor;
pub use graph::{Node, OntologyGraph, TripleQuery};
pub use model::{
    short_name, ClassDescriptor, PropertyDescriptor, PropertyKind, PropertyRange, ScalarKind,
    SchemaModel, DEFAULT_VERSION, OBJECT_TAG,
};
