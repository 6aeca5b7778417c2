//! Cross-version schema evolution.
//!
//! Compares two [`SchemaModel`](owlgen_schema::SchemaModel)s of the same
//! ontology into a [`Delta`], and turns a delta into a [`MigrationRuleSet`]
//! that can bring payloads recorded under the old version up to the new one.
//!
//! ```
//! use owlgen_evolution::{Delta, MigrationRuleSet};
//! use owlgen_schema::{ClassDescriptor, PropertyDescriptor, ScalarKind, SchemaModel};
//!
//! let old = SchemaModel::new("1.0.0", vec![ClassDescriptor::new("Classroom")], vec![]);
//! let new = SchemaModel::new(
//!     "1.1.0",
//!     vec![ClassDescriptor::new("Classroom")],
//!     vec![PropertyDescriptor::datatype("hasProjector", "Classroom", ScalarKind::Boolean)],
//! );
//! let rules = MigrationRuleSet::synthesize(&Delta::compute(&old, &new), &new);
//! let migrated = rules.migrate(serde_json::json!({"Classroom": {}}), "1.0.0");
//! assert_eq!(migrated["Classroom"]["hasProjector"], false);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod defaults;
pub mod diff;
pub mod rules;
pub mod similarity;

pub use defaults::{canonical_default, scalar_default};
pub use diff::{Change, ClassChange, Delta, PropertyChange};
pub use rules::{AddedField, Coercion, MigrationRuleSet, TypeChange};
pub use similarity::{is_rename, similarity, RENAME_THRESHOLD};
