//! Builds a [`SchemaModel`] from a queryable ontology graph.

use tracing::debug;

use crate::error::SchemaExtractionError;
use crate::graph::{Node, TripleQuery};
use crate::model::iris::*;
use crate::model::{
    short_name, ClassDescriptor, PropertyDescriptor, PropertyKind, PropertyRange, ScalarKind,
    SchemaModel, DEFAULT_VERSION,
};

/// Reads classes, properties and the version annotation from a graph.
pub struct SchemaExtractor<'g, G: TripleQuery + ?Sized> {
    graph: &'g G,
}

impl<'g, G: TripleQuery + ?Sized> SchemaExtractor<'g, G> {
    /// Wraps a graph handle.
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Extracts the complete schema model.
    ///
    /// `version_override` replaces the `owl:versionInfo` annotation when set.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaExtractionError`] if the graph cannot be iterated.
    pub fn extract(
        &self,
        version_override: Option<&str>,
    ) -> Result<SchemaModel, SchemaExtractionError> {
        let version = match version_override {
            Some(version) => version.to_string(),
            None => self.version()?,
        };
        let classes = self.extract_classes()?;
        let properties = self.extract_properties()?;
        debug!(
            version = %version,
            classes = classes.len(),
            properties = properties.len(),
            "extracted schema model"
        );
        Ok(SchemaModel::new(version, classes, properties))
    }

    /// Reads `owl:versionInfo` from the `owl:Ontology` resource, defaulting
    /// to [`DEFAULT_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaExtractionError`] if the graph cannot be iterated.
    pub fn version(&self) -> Result<String, SchemaExtractionError> {
        for ontology in self.graph.subjects_with(RDF_TYPE, OWL_ONTOLOGY)? {
            let Some(iri) = ontology.as_iri() else {
                continue;
            };
            if let Some(version) = self.first_literal(iri, OWL_VERSION_INFO)? {
                return Ok(version);
            }
        }
        Ok(DEFAULT_VERSION.to_string())
    }

    /// Enumerates every `owl:Class` with a name.
    ///
    /// Only the first `rdfs:subClassOf` edge naming another class is kept;
    /// anonymous superclasses (restrictions) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaExtractionError`] if the graph cannot be iterated.
    pub fn extract_classes(&self) -> Result<Vec<ClassDescriptor>, SchemaExtractionError> {
        let mut classes = Vec::new();
        for node in self.graph.subjects_with(RDF_TYPE, OWL_CLASS)? {
            let Some(iri) = node.as_iri() else {
                continue;
            };
            let name = short_name(iri).to_string();
            let parents = self.graph.objects_of(iri, RDFS_SUBCLASS_OF)?;
            let parent = parents
                .iter()
                .find_map(Node::as_iri)
                .map(|p| short_name(p).to_string());
            let named_parents = parents.iter().filter(|p| p.as_iri().is_some()).count();
            if named_parents > 1 {
                debug!(class = %name, parents = named_parents, "keeping first parent only");
            }
            let label = self.first_literal(iri, RDFS_LABEL)?;
            classes.push(ClassDescriptor {
                label: label.unwrap_or_else(|| name.clone()),
                iri: iri.to_string(),
                parent,
                comment: self.first_literal(iri, RDFS_COMMENT)?,
                name,
            });
        }
        Ok(classes)
    }

    /// Enumerates object properties, then datatype properties.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaExtractionError`] if the graph cannot be iterated.
    pub fn extract_properties(&self) -> Result<Vec<PropertyDescriptor>, SchemaExtractionError> {
        let mut properties = Vec::new();
        for (type_iri, kind) in [
            (OWL_OBJECT_PROPERTY, PropertyKind::Object),
            (OWL_DATATYPE_PROPERTY, PropertyKind::Datatype),
        ] {
            for node in self.graph.subjects_with(RDF_TYPE, type_iri)? {
                let Some(iri) = node.as_iri() else {
                    continue;
                };
                properties.push(self.property(iri, kind)?);
            }
        }
        Ok(properties)
    }

    fn property(
        &self,
        iri: &str,
        kind: PropertyKind,
    ) -> Result<PropertyDescriptor, SchemaExtractionError> {
        let name = short_name(iri).to_string();
        let domain = self.first_iri(iri, RDFS_DOMAIN)?.map(|d| short_name(&d).to_string());
        let range_iri = self.first_iri(iri, RDFS_RANGE)?;
        let range = match kind {
            PropertyKind::Datatype => PropertyRange::Scalar(
                range_iri
                    .as_deref()
                    .and_then(ScalarKind::from_xsd)
                    .unwrap_or(ScalarKind::String),
            ),
            PropertyKind::Object => match range_iri {
                Some(range) => PropertyRange::Class(short_name(&range).to_string()),
                None => PropertyRange::Object,
            },
        };
        let label = self.first_literal(iri, RDFS_LABEL)?;
        debug!(property = %name, %kind, %range, "extracted property");
        Ok(PropertyDescriptor {
            label: label.unwrap_or_else(|| name.clone()),
            iri: iri.to_string(),
            kind,
            domain,
            range,
            comment: self.first_literal(iri, RDFS_COMMENT)?,
            name,
        })
    }

    fn first_literal(
        &self,
        subject: &str,
        predicate: &str,
    ) -> Result<Option<String>, SchemaExtractionError> {
        Ok(self
            .graph
            .objects_of(subject, predicate)?
            .iter()
            .find_map(Node::as_literal)
            .map(str::to_string))
    }

    fn first_iri(
        &self,
        subject: &str,
        predicate: &str,
    ) -> Result<Option<String>, SchemaExtractionError> {
        Ok(self
            .graph
            .objects_of(subject, predicate)?
            .iter()
            .find_map(Node::as_iri)
            .map(str::to_string))
    }
}
