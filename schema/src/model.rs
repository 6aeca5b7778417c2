//! Core schema model types.
//!
//! A [`SchemaModel`] is the structured view of one ontology version: its
//! classes, properties and single-parent class hierarchy. Models are built
//! once per extraction and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

/// Version reported when the ontology carries no `owl:versionInfo`.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Type tag used for object properties whose range could not be resolved.
pub const OBJECT_TAG: &str = "object";

/// The seven canonical scalar kinds a datatype property can range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    /// `xsd:string` and friends. Also the fallback for unknown datatypes.
    String,
    /// `xsd:integer` and the bounded integer types.
    Integer,
    /// `xsd:float`.
    Float,
    /// `xsd:double` / `xsd:decimal`.
    Double,
    /// `xsd:date`.
    Date,
    /// `xsd:dateTime`.
    DateTime,
    /// `xsd:boolean`.
    Boolean,
}

impl ScalarKind {
    /// Every scalar kind, in canonical order.
    pub const ALL: [ScalarKind; 7] = [
        ScalarKind::String,
        ScalarKind::Integer,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::Date,
        ScalarKind::DateTime,
        ScalarKind::Boolean,
    ];

    /// Returns the target-independent type tag (e.g. `"integer"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Boolean => "boolean",
        }
    }

    /// Parses a type tag produced by [`ScalarKind::as_str`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Maps an XSD datatype IRI onto its scalar kind.
    ///
    /// Returns `None` for datatypes outside the supported vocabulary; callers
    /// fall back to [`ScalarKind::String`].
    #[must_use]
    pub fn from_xsd(iri: &str) -> Option<Self> {
        let local = iri.strip_prefix(iris::XSD)?;
        match local {
            "string" | "normalizedString" | "token" | "anyURI" => Some(ScalarKind::String),
            "integer" | "int" | "long" | "short" | "nonNegativeInteger"
            | "positiveInteger" | "negativeInteger" | "nonPositiveInteger" => {
                Some(ScalarKind::Integer)
            }
            "float" => Some(ScalarKind::Float),
            "double" | "decimal" => Some(ScalarKind::Double),
            "date" => Some(ScalarKind::Date),
            "dateTime" => Some(ScalarKind::DateTime),
            "boolean" => Some(ScalarKind::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a property relates two resources or a resource and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyKind {
    /// `owl:ObjectProperty`.
    Object,
    /// `owl:DatatypeProperty`.
    Datatype,
}

impl PropertyKind {
    /// Returns the OWL local name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Object => "ObjectProperty",
            PropertyKind::Datatype => "DatatypeProperty",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The range of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyRange {
    /// A literal of one of the canonical scalar kinds.
    Scalar(ScalarKind),
    /// A reference to another class, by short name.
    Class(String),
    /// An object reference whose class could not be resolved.
    Object,
}

impl PropertyRange {
    /// Returns the type tag of this range: the scalar kind, the class name,
    /// or [`OBJECT_TAG`].
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            PropertyRange::Scalar(kind) => kind.as_str(),
            PropertyRange::Class(name) => name,
            PropertyRange::Object => OBJECT_TAG,
        }
    }

    /// Returns the scalar kind if this is a literal range.
    #[must_use]
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            PropertyRange::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// An OWL class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Short name, unique within a model (e.g. `"Student"`).
    pub name: String,
    /// Full identifier the name was derived from.
    pub iri: String,
    /// Human-readable label (`rdfs:label`), defaulting to the name.
    pub label: String,
    /// Short name of the single recorded parent class (`rdfs:subClassOf`).
    pub parent: Option<String>,
    /// Description (`rdfs:comment`).
    pub comment: Option<String>,
}

impl ClassDescriptor {
    /// Creates a root class whose identifier and label are its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            iri: name.clone(),
            label: name.clone(),
            name,
            parent: None,
            comment: None,
        }
    }

    /// Sets the parent class.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// An OWL object or datatype property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Short name, unique within a model (e.g. `"enrolledIn"`).
    pub name: String,
    /// Full identifier the name was derived from.
    pub iri: String,
    /// Human-readable label (`rdfs:label`), defaulting to the name.
    pub label: String,
    /// Object or datatype property.
    pub kind: PropertyKind,
    /// Short name of the domain class, or `None` if unresolved.
    pub domain: Option<String>,
    /// Literal kind or referenced class.
    pub range: PropertyRange,
    /// Description (`rdfs:comment`).
    pub comment: Option<String>,
}

impl PropertyDescriptor {
    /// Creates a datatype property on `domain`.
    pub fn datatype(name: impl Into<String>, domain: impl Into<String>, kind: ScalarKind) -> Self {
        Self::build(
            name.into(),
            PropertyKind::Datatype,
            Some(domain.into()),
            PropertyRange::Scalar(kind),
        )
    }

    /// Creates an object property from `domain` to the class `range`.
    pub fn object(
        name: impl Into<String>,
        domain: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self::build(
            name.into(),
            PropertyKind::Object,
            Some(domain.into()),
            PropertyRange::Class(range.into()),
        )
    }

    fn build(name: String, kind: PropertyKind, domain: Option<String>, range: PropertyRange) -> Self {
        Self {
            iri: name.clone(),
            label: name.clone(),
            name,
            kind,
            domain,
            range,
            comment: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns true if the property points back at its own domain class.
    #[must_use]
    pub fn is_self_referential(&self) -> bool {
        match (&self.range, &self.domain) {
            (PropertyRange::Class(range), Some(domain)) => range == domain,
            _ => false,
        }
    }
}

/// One version of an ontology schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaModel {
    version: String,
    classes: BTreeMap<String, ClassDescriptor>,
    properties: Vec<PropertyDescriptor>,
    hierarchy: BTreeMap<String, String>,
}

impl SchemaModel {
    /// Assembles a model.
    ///
    /// Names must be unique: when a class or property name repeats, the first
    /// declaration is kept and the later ones are dropped with a warning.
    pub fn new(
        version: impl Into<String>,
        classes: impl IntoIterator<Item = ClassDescriptor>,
        properties: impl IntoIterator<Item = PropertyDescriptor>,
    ) -> Self {
        let mut class_map = BTreeMap::new();
        for class in classes {
            if class_map.contains_key(&class.name) {
                warn!(class = %class.name, iri = %class.iri, "dropping duplicate class name");
                continue;
            }
            class_map.insert(class.name.clone(), class);
        }

        let mut property_list: Vec<PropertyDescriptor> = Vec::new();
        for property in properties {
            if property_list.iter().any(|p| p.name == property.name) {
                warn!(property = %property.name, iri = %property.iri, "dropping duplicate property name");
                continue;
            }
            property_list.push(property);
        }

        let hierarchy = class_map
            .values()
            .filter_map(|c| c.parent.clone().map(|parent| (c.name.clone(), parent)))
            .collect();

        Self {
            version: version.into(),
            classes: class_map,
            properties: property_list,
            hierarchy,
        }
    }

    /// Ontology version string (e.g. `"1.1.0"`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All classes keyed by short name.
    #[must_use]
    pub fn classes(&self) -> &BTreeMap<String, ClassDescriptor> {
        &self.classes
    }

    /// All properties in extraction order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Child → parent mapping for every class with a recorded parent.
    #[must_use]
    pub fn hierarchy(&self) -> &BTreeMap<String, String> {
        &self.hierarchy
    }

    /// Looks up a class by short name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    /// Looks up a property by short name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns the recorded parent of a class.
    #[must_use]
    pub fn parent_of(&self, class: &str) -> Option<&str> {
        self.hierarchy.get(class).map(String::as_str)
    }

    /// Properties whose domain is `class`, in extraction order.
    pub fn properties_of<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a PropertyDescriptor> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.domain.as_deref() == Some(class))
    }

    /// Returns the total number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the total number of properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

/// Derives a short name from a resource identifier.
///
/// Takes the fragment after `#`, else the final path segment. Never fails: an
/// identifier with neither yields itself.
#[must_use]
pub fn short_name(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.rsplit_once('#') {
        if !fragment.is_empty() {
            return fragment;
        }
    }
    let trimmed = iri.trim_end_matches(['/', '#']);
    match trimmed.rsplit_once('/') {
        Some((_, segment)) if !segment.is_empty() => segment,
        _ => trimmed,
    }
}

/// Standard IRI constants used by the extractor.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// `owl:Ontology`.
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:DatatypeProperty`.
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    /// `owl:versionInfo`.
    pub const OWL_VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
}
