//! Schema diffing.
//!
//! Compares two [`SchemaModel`] versions of the same ontology and produces a
//! structured [`Delta`] of all changes between them.

use std::collections::{BTreeMap, BTreeSet};

use owlgen_schema::{PropertyKind, PropertyRange, SchemaModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::similarity::is_rename;

/// An old and a new value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    /// Value in the old model.
    pub old: T,
    /// Value in the new model.
    pub new: T,
}

impl<T: PartialEq> Change<T> {
    fn between(old: T, new: T) -> Option<Self> {
        (old != new).then_some(Self { old, new })
    }
}

/// Parent-set change of a class present in both models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassChange {
    /// Parents recorded only in the new model.
    pub added_parents: Vec<String>,
    /// Parents recorded only in the old model.
    pub removed_parents: Vec<String>,
}

/// Changes to a property present in both models. Each attribute is compared
/// independently; any combination may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyChange {
    /// Domain class change.
    pub domain: Option<Change<Option<String>>>,
    /// Range change.
    pub range: Option<Change<PropertyRange>>,
    /// Object/datatype kind change.
    pub kind: Option<Change<PropertyKind>>,
}

impl PropertyChange {
    /// True if the domain differs.
    #[must_use]
    pub fn domain_changed(&self) -> bool {
        self.domain.is_some()
    }

    /// True if the range differs.
    #[must_use]
    pub fn range_changed(&self) -> bool {
        self.range.is_some()
    }

    /// True if the kind differs.
    #[must_use]
    pub fn kind_changed(&self) -> bool {
        self.kind.is_some()
    }

    fn is_empty(&self) -> bool {
        !self.domain_changed() && !self.range_changed() && !self.kind_changed()
    }
}

/// Complete diff between two schema models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// Version of the old model.
    pub from_version: String,
    /// Version of the new model.
    pub to_version: String,
    /// Classes only in the new model.
    pub added_classes: BTreeSet<String>,
    /// Classes only in the old model.
    pub removed_classes: BTreeSet<String>,
    /// Classes in both models whose parents differ.
    pub changed_classes: BTreeMap<String, ClassChange>,
    /// Properties only in the new model.
    pub added_properties: BTreeSet<String>,
    /// Properties only in the old model.
    pub removed_properties: BTreeSet<String>,
    /// Properties in both models whose domain, range or kind differ.
    pub changed_properties: BTreeMap<String, PropertyChange>,
    /// Old name → new label, for entities whose label was edited.
    pub renamed: BTreeMap<String, String>,
}

impl Delta {
    /// Compute the diff between two schema models.
    pub fn compute(old: &SchemaModel, new: &SchemaModel) -> Self {
        let old_classes: BTreeSet<&String> = old.classes().keys().collect();
        let new_classes: BTreeSet<&String> = new.classes().keys().collect();
        let old_props: BTreeSet<&String> = old.properties().iter().map(|p| &p.name).collect();
        let new_props: BTreeSet<&String> = new.properties().iter().map(|p| &p.name).collect();

        let delta = Delta {
            from_version: old.version().to_string(),
            to_version: new.version().to_string(),
            added_classes: owned(new_classes.difference(&old_classes)),
            removed_classes: owned(old_classes.difference(&new_classes)),
            changed_classes: Self::diff_classes(old, new, &old_classes, &new_classes),
            added_properties: owned(new_props.difference(&old_props)),
            removed_properties: owned(old_props.difference(&new_props)),
            changed_properties: Self::diff_properties(old, new, &old_props, &new_props),
            renamed: Self::detect_renames(old, new, &old_classes, &new_classes, &old_props, &new_props),
        };
        debug!(
            from = %delta.from_version,
            to = %delta.to_version,
            changes = delta.change_count(),
            "computed schema delta"
        );
        delta
    }

    /// Check if there are any changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    /// Get the total number of recorded changes across all buckets.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.added_classes.len()
            + self.removed_classes.len()
            + self.changed_classes.len()
            + self.added_properties.len()
            + self.removed_properties.len()
            + self.changed_properties.len()
            + self.renamed.len()
    }

    fn diff_classes(
        old: &SchemaModel,
        new: &SchemaModel,
        old_names: &BTreeSet<&String>,
        new_names: &BTreeSet<&String>,
    ) -> BTreeMap<String, ClassChange> {
        let mut changes = BTreeMap::new();
        for name in old_names.intersection(new_names) {
            let old_parents: BTreeSet<&str> = old.parent_of(name).into_iter().collect();
            let new_parents: BTreeSet<&str> = new.parent_of(name).into_iter().collect();
            if old_parents == new_parents {
                continue;
            }
            let change = ClassChange {
                added_parents: new_parents
                    .difference(&old_parents)
                    .map(|p| (*p).to_string())
                    .collect(),
                removed_parents: old_parents
                    .difference(&new_parents)
                    .map(|p| (*p).to_string())
                    .collect(),
            };
            debug!(class = %name, ?change, "class hierarchy changed");
            changes.insert((*name).clone(), change);
        }
        changes
    }

    fn diff_properties(
        old: &SchemaModel,
        new: &SchemaModel,
        old_names: &BTreeSet<&String>,
        new_names: &BTreeSet<&String>,
    ) -> BTreeMap<String, PropertyChange> {
        let mut changes = BTreeMap::new();
        for name in old_names.intersection(new_names) {
            let (Some(from), Some(to)) = (old.property(name), new.property(name)) else {
                continue;
            };
            let change = PropertyChange {
                domain: Change::between(from.domain.clone(), to.domain.clone()),
                range: Change::between(from.range.clone(), to.range.clone()),
                kind: Change::between(from.kind, to.kind),
            };
            if !change.is_empty() {
                debug!(property = %name, ?change, "property changed");
                changes.insert((*name).clone(), change);
            }
        }
        changes
    }

    /// Label-based rename heuristic. Each entity is judged on its own; no
    /// matching across entities is attempted, so colliding labels are not
    /// disambiguated.
    fn detect_renames(
        old: &SchemaModel,
        new: &SchemaModel,
        old_classes: &BTreeSet<&String>,
        new_classes: &BTreeSet<&String>,
        old_props: &BTreeSet<&String>,
        new_props: &BTreeSet<&String>,
    ) -> BTreeMap<String, String> {
        let mut renamed = BTreeMap::new();

        let class_labels = old_classes.intersection(new_classes).filter_map(|name| {
            let from = old.class(name)?;
            let to = new.class(name)?;
            Some((*name, from.label.as_str(), to.label.as_str()))
        });
        let property_labels = old_props.intersection(new_props).filter_map(|name| {
            let from = old.property(name)?;
            let to = new.property(name)?;
            Some((*name, from.label.as_str(), to.label.as_str()))
        });

        for (name, old_label, new_label) in class_labels.chain(property_labels) {
            if is_rename(old_label, new_label) {
                debug!(%name, %old_label, %new_label, "detected rename");
                // Classes and properties share one key space; the property
                // rename is the one kept.
                if let Some(shadowed) = renamed.insert(name.clone(), new_label.to_string()) {
                    warn!(
                        %name,
                        %shadowed,
                        kept = %new_label,
                        "class and property share a name, class rename dropped"
                    );
                }
            }
        }
        renamed
    }
}

fn owned<'a, 'b: 'a>(names: impl Iterator<Item = &'a &'b String>) -> BTreeSet<String> {
    names.map(|name| (*name).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use owlgen_schema::{ClassDescriptor, PropertyDescriptor, ScalarKind};

    fn campus(version: &str) -> SchemaModel {
        SchemaModel::new(
            version,
            vec![
                ClassDescriptor::new("Person"),
                ClassDescriptor::new("Student").with_parent("Person"),
                ClassDescriptor::new("Course"),
            ],
            vec![
                PropertyDescriptor::datatype("name", "Person", ScalarKind::String),
                PropertyDescriptor::object("enrolledIn", "Student", "Course"),
            ],
        )
    }

    #[test]
    fn identical_models_have_empty_delta() {
        let model = campus("1.0.0");
        let delta = Delta::compute(&model, &model);
        assert!(delta.is_empty());
        assert_eq!(delta.change_count(), 0);
    }

    #[test]
    fn added_and_removed_entities() {
        let old = campus("1.0.0");
        let new = SchemaModel::new(
            "1.1.0",
            vec![
                ClassDescriptor::new("Person"),
                ClassDescriptor::new("Student").with_parent("Person"),
                ClassDescriptor::new("Classroom"),
            ],
            vec![
                PropertyDescriptor::datatype("name", "Person", ScalarKind::String),
                PropertyDescriptor::datatype("capacity", "Classroom", ScalarKind::Integer),
            ],
        );
        let delta = Delta::compute(&old, &new);
        assert_eq!(delta.from_version, "1.0.0");
        assert_eq!(delta.to_version, "1.1.0");
        assert_eq!(delta.added_classes, BTreeSet::from(["Classroom".to_string()]));
        assert_eq!(delta.removed_classes, BTreeSet::from(["Course".to_string()]));
        assert_eq!(delta.added_properties, BTreeSet::from(["capacity".to_string()]));
        assert_eq!(delta.removed_properties, BTreeSet::from(["enrolledIn".to_string()]));
        assert!(delta.changed_classes.is_empty());
        assert!(delta.changed_properties.is_empty());
    }

    #[test]
    fn parent_changes_list_both_sides() {
        let old = campus("1.0.0");
        let new = SchemaModel::new(
            "2.0.0",
            vec![
                ClassDescriptor::new("Person"),
                ClassDescriptor::new("Student").with_parent("Learner"),
                ClassDescriptor::new("Course").with_parent("Offering"),
            ],
            old.properties().to_vec(),
        );
        let delta = Delta::compute(&old, &new);
        assert_eq!(
            delta.changed_classes.get("Student"),
            Some(&ClassChange {
                added_parents: vec!["Learner".to_string()],
                removed_parents: vec!["Person".to_string()],
            })
        );
        assert_eq!(
            delta.changed_classes.get("Course"),
            Some(&ClassChange {
                added_parents: vec!["Offering".to_string()],
                removed_parents: Vec::new(),
            })
        );
    }

    #[test]
    fn co_occurring_property_changes_are_all_recorded() {
        let old = campus("1.0.0");
        let moved = PropertyDescriptor::datatype("enrolledIn", "Person", ScalarKind::String);
        let new = SchemaModel::new(
            "1.1.0",
            old.classes().values().cloned(),
            vec![
                PropertyDescriptor::datatype("name", "Person", ScalarKind::Integer),
                moved,
            ],
        );
        let delta = Delta::compute(&old, &new);

        let name = &delta.changed_properties["name"];
        assert!(name.range_changed());
        assert!(!name.domain_changed());
        assert!(!name.kind_changed());

        let enrolled = &delta.changed_properties["enrolledIn"];
        assert!(enrolled.range_changed());
        assert!(enrolled.domain_changed());
        assert!(enrolled.kind_changed());
        assert_eq!(
            enrolled.domain,
            Some(Change {
                old: Some("Student".to_string()),
                new: Some("Person".to_string()),
            })
        );
    }

    #[test]
    fn relabelled_entities_are_renames() {
        let old = SchemaModel::new(
            "1.0.0",
            vec![ClassDescriptor::new("Uni").with_label("University")],
            vec![PropertyDescriptor::datatype("established", "Uni", ScalarKind::Integer)
                .with_label("founded_year")],
        );
        let new = SchemaModel::new(
            "1.1.0",
            vec![ClassDescriptor::new("Uni").with_label("Universities")],
            vec![PropertyDescriptor::datatype("established", "Uni", ScalarKind::Integer)
                .with_label("founding_year")],
        );
        let delta = Delta::compute(&old, &new);
        assert!(delta.changed_properties.is_empty());
        assert_eq!(delta.renamed.get("established").map(String::as_str), Some("founding_year"));
        assert_eq!(delta.renamed.get("Uni").map(String::as_str), Some("Universities"));
    }

    #[test]
    fn property_rename_wins_a_shared_name() {
        let old = SchemaModel::new(
            "1.0.0",
            vec![ClassDescriptor::new("address").with_label("Address")],
            vec![PropertyDescriptor::datatype("address", "address", ScalarKind::String)
                .with_label("street_address")],
        );
        let new = SchemaModel::new(
            "1.1.0",
            vec![ClassDescriptor::new("address").with_label("Addresses")],
            vec![PropertyDescriptor::datatype("address", "address", ScalarKind::String)
                .with_label("street_addresses")],
        );
        let delta = Delta::compute(&old, &new);
        assert_eq!(delta.renamed.len(), 1);
        assert_eq!(
            delta.renamed.get("address").map(String::as_str),
            Some("street_addresses")
        );
    }

    #[test]
    fn dissimilar_labels_are_not_renames() {
        let old = SchemaModel::new(
            "1.0.0",
            vec![ClassDescriptor::new("Room").with_label("abcd")],
            Vec::new(),
        );
        let new = SchemaModel::new(
            "1.1.0",
            vec![ClassDescriptor::new("Room").with_label("abxy")],
            Vec::new(),
        );
        assert!(Delta::compute(&old, &new).renamed.is_empty());
    }
}
