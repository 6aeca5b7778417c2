//! Triple-query contract and its sophia-backed implementation.
//!
//! The extractor only needs two lookups over a parsed ontology: "which
//! subjects have this predicate/object pair" and "which objects does this
//! subject have for this predicate". [`TripleQuery`] captures exactly that;
//! [`OntologyGraph`] answers it over an in-memory sophia graph loaded from
//! RDF/XML or Turtle.

use std::fs;
use std::path::Path;

use sophia_api::graph::Graph;
use sophia_api::source::TripleSource;
use sophia_api::term::matcher::Any;
use sophia_api::term::{IriRef, Term, TermKind};
use sophia_api::triple::Triple;
use sophia_inmem::graph::LightGraph;
use tracing::debug;

use crate::error::{ParseError, SchemaExtractionError};

/// A term returned by a graph lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A named resource.
    Iri(String),
    /// An anonymous resource (e.g. an OWL restriction).
    Blank(String),
    /// A literal, by lexical form.
    Literal(String),
}

impl Node {
    /// Returns the IRI if this node is a named resource.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the lexical form if this node is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Node::Literal(value) => Some(value),
            _ => None,
        }
    }
}

/// Read-only triple queries over a parsed ontology.
pub trait TripleQuery {
    /// Returns every subject `s` with a triple `(s, predicate, object)`, in
    /// graph order, without duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying graph cannot be iterated.
    fn subjects_with(&self, predicate: &str, object: &str)
        -> Result<Vec<Node>, SchemaExtractionError>;

    /// Returns every object `o` with a triple `(subject, predicate, o)`, in
    /// graph order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying graph cannot be iterated.
    fn objects_of(&self, subject: &str, predicate: &str)
        -> Result<Vec<Node>, SchemaExtractionError>;
}

/// An ontology document loaded into memory.
pub struct OntologyGraph {
    graph: LightGraph,
}

impl OntologyGraph {
    /// Reads and parses an ontology document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Io`] if the file cannot be read and
    /// [`ParseError::Syntax`] if it is neither RDF/XML nor Turtle.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = Self::parse_str(&source)?;
        debug!(path = %path.display(), triples = graph.len(), "loaded ontology graph");
        Ok(graph)
    }

    /// Parses an in-memory document. RDF/XML is recognised by its XML
    /// prolog or `rdf:RDF` root; anything else is parsed as Turtle.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] if parsing fails.
    pub fn parse_str(source: &str) -> Result<Self, ParseError> {
        let graph: LightGraph = if is_rdf_xml(source) {
            sophia_xml::parser::parse_str(source)
                .collect_triples()
                .map_err(|err| ParseError::Syntax {
                    syntax: "RDF/XML",
                    message: err.to_string(),
                })?
        } else {
            sophia_turtle::parser::turtle::parse_str(source)
                .collect_triples()
                .map_err(|err| ParseError::Syntax {
                    syntax: "Turtle",
                    message: err.to_string(),
                })?
        };
        Ok(Self { graph })
    }

    /// Returns the number of triples in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.triples().count()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TripleQuery for OntologyGraph {
    fn subjects_with(
        &self,
        predicate: &str,
        object: &str,
    ) -> Result<Vec<Node>, SchemaExtractionError> {
        let mut subjects: Vec<Node> = Vec::new();
        let matches = self.graph.triples_matching(
            Any,
            [IriRef::new_unchecked(predicate)],
            [IriRef::new_unchecked(object)],
        );
        for triple in matches {
            let triple = triple.map_err(SchemaExtractionError::new)?;
            if let Some(node) = to_node(triple.s()) {
                if !subjects.contains(&node) {
                    subjects.push(node);
                }
            }
        }
        Ok(subjects)
    }

    fn objects_of(
        &self,
        subject: &str,
        predicate: &str,
    ) -> Result<Vec<Node>, SchemaExtractionError> {
        let mut objects = Vec::new();
        let matches = self.graph.triples_matching(
            [IriRef::new_unchecked(subject)],
            [IriRef::new_unchecked(predicate)],
            Any,
        );
        for triple in matches {
            let triple = triple.map_err(SchemaExtractionError::new)?;
            objects.extend(to_node(triple.o()));
        }
        Ok(objects)
    }
}

fn is_rdf_xml(source: &str) -> bool {
    let head = source.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<?xml") || head.starts_with("<rdf:RDF") || head.starts_with("<!DOCTYPE")
}

fn to_node<T: Term>(term: T) -> Option<Node> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term.bnode_id().map(|id| Node::Blank(id.as_str().to_owned())),
        TermKind::Literal => term.lexical_form().map(|lex| Node::Literal(String::from(&*lex))),
        _ => None,
    }
}
