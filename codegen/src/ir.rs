//! Target-independent intermediate representation consumed by the formatters.
//!
//! The IR fixes everything the formatters must agree on. Classes are visited
//! by name and each is placed right after its ancestors, so a base class is
//! always defined before it is referenced. Fields keep extraction order and
//! carry their shape and default value.

use std::collections::BTreeSet;

use owlgen_evolution::canonical_default;
use owlgen_schema::{PropertyDescriptor, PropertyKind, PropertyRange, ScalarKind, SchemaModel};
use serde_json::Value;
use tracing::{debug, warn};

/// Shape of a generated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A literal value.
    Scalar(ScalarKind),
    /// A single optional reference to another generated class.
    Reference(String),
    /// A collection of the declaring class (self-referential property).
    Collection(String),
    /// A reference whose class is unknown or not generated.
    Untyped,
}

/// One field of a generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIr {
    /// Property name, used verbatim as the field name.
    pub name: String,
    /// Field shape.
    pub kind: FieldKind,
    /// Object or datatype property.
    pub property_kind: PropertyKind,
    /// Type tag of the property range.
    pub type_tag: String,
    /// Value the default constructor assigns.
    pub default: Value,
    /// Description.
    pub comment: Option<String>,
}

/// One generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassIr {
    /// Class name.
    pub name: String,
    /// Base class, always a class emitted earlier in the same model.
    pub parent: Option<String>,
    /// Description.
    pub comment: Option<String>,
    /// Fields declared by this class, excluding inherited ones.
    pub fields: Vec<FieldIr>,
}

/// The whole model, ready for formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelIr {
    /// Ontology version.
    pub version: String,
    /// Classes, parents first.
    pub classes: Vec<ClassIr>,
}

impl ModelIr {
    /// Lowers a schema model.
    ///
    /// Parents that are not classes of the model, and parent links that would
    /// close a cycle, are dropped. Properties whose domain is not a class of
    /// the model are not emitted.
    pub fn build(model: &SchemaModel) -> Self {
        let mut order = ClassOrder {
            model,
            placed: BTreeSet::new(),
            visiting: BTreeSet::new(),
            order: Vec::new(),
        };
        for name in model.classes().keys() {
            order.visit(name);
        }

        let classes = order
            .order
            .into_iter()
            .filter_map(|(name, parent)| {
                let class = model.class(name)?;
                let fields = model
                    .properties_of(name)
                    .map(|property| lower_field(model, property))
                    .collect();
                Some(ClassIr {
                    name: class.name.clone(),
                    parent: parent.map(str::to_string),
                    comment: class.comment.clone(),
                    fields,
                })
            })
            .collect();

        for property in model.properties() {
            let emitted = property
                .domain
                .as_deref()
                .is_some_and(|domain| model.class(domain).is_some());
            if !emitted {
                debug!(property = %property.name, domain = ?property.domain, "property has no generated class");
            }
        }

        Self {
            version: model.version().to_string(),
            classes,
        }
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassIr> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// Every field of every class.
    pub fn fields(&self) -> impl Iterator<Item = &FieldIr> {
        self.classes.iter().flat_map(|class| class.fields.iter())
    }

    /// True if any field satisfies `pred`.
    pub fn any_field(&self, pred: impl Fn(&FieldIr) -> bool) -> bool {
        self.fields().any(pred)
    }

    /// Total number of fields.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields().count()
    }
}

fn lower_field(model: &SchemaModel, property: &PropertyDescriptor) -> FieldIr {
    let kind = match &property.range {
        PropertyRange::Scalar(scalar) => FieldKind::Scalar(*scalar),
        PropertyRange::Class(class) if model.class(class).is_none() => {
            debug!(property = %property.name, range = %class, "range class not generated");
            FieldKind::Untyped
        }
        PropertyRange::Class(class) if property.is_self_referential() => {
            FieldKind::Collection(class.clone())
        }
        PropertyRange::Class(class) => FieldKind::Reference(class.clone()),
        PropertyRange::Object => FieldKind::Untyped,
    };
    let default = match kind {
        FieldKind::Collection(_) => Value::Array(Vec::new()),
        _ => canonical_default(&property.range),
    };
    FieldIr {
        name: property.name.clone(),
        kind,
        property_kind: property.kind,
        type_tag: property.range.type_tag().to_string(),
        default,
        comment: property.comment.clone(),
    }
}

/// Depth-first placement of classes after their parents.
struct ClassOrder<'m> {
    model: &'m SchemaModel,
    placed: BTreeSet<&'m str>,
    visiting: BTreeSet<&'m str>,
    order: Vec<(&'m str, Option<&'m str>)>,
}

impl<'m> ClassOrder<'m> {
    fn visit(&mut self, name: &'m str) {
        if self.placed.contains(name) {
            return;
        }
        self.visiting.insert(name);

        let parent = match self.model.parent_of(name) {
            Some(parent) if self.model.class(parent).is_none() => {
                debug!(class = %name, %parent, "parent is not a class of this model");
                None
            }
            Some(parent) if self.visiting.contains(parent) => {
                warn!(class = %name, %parent, "breaking inheritance cycle");
                None
            }
            Some(parent) => {
                self.visit(parent);
                Some(parent)
            }
            None => None,
        };

        self.visiting.remove(name);
        self.placed.insert(name);
        self.order.push((name, parent));
    }
}
