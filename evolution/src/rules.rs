//! Migration rule synthesis and the runtime migration contract.
//!
//! A [`MigrationRuleSet`] is derived from one [`Delta`] and carries the
//! version pair it was computed for. [`MigrationRuleSet::migrate`] applies
//! it to a payload shaped as `{ entity: { field: value, .. }, .. }`.

use std::collections::{BTreeMap, BTreeSet};

use owlgen_schema::{PropertyRange, ScalarKind, SchemaModel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::defaults::canonical_default;
use crate::diff::{ClassChange, Delta};

/// A field introduced by the newer version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedField {
    /// Type tag of the field's range.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Value injected into payloads that lack the field.
    pub default: Value,
}

/// Old and new type tag of a field whose range changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeChange {
    /// Tag in the older version.
    pub old: String,
    /// Tag in the newer version.
    pub new: String,
}

/// The value conversions `migrate` knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// integer → float or double.
    Widen,
    /// string → integer.
    Parse,
    /// float or double → integer, dropping the fraction.
    Truncate,
}

impl Coercion {
    /// Looks up the conversion for a pair of type tags. Any pair outside the
    /// table is a no-op and yields `None`.
    #[must_use]
    pub fn between(old: &str, new: &str) -> Option<Self> {
        use ScalarKind::{Double, Float, Integer};
        match (ScalarKind::from_tag(old)?, ScalarKind::from_tag(new)?) {
            (Integer, Float | Double) => Some(Coercion::Widen),
            (ScalarKind::String, Integer) => Some(Coercion::Parse),
            (Float | Double, Integer) => Some(Coercion::Truncate),
            _ => None,
        }
    }

    /// Converts a value, or returns `None` if it cannot be converted.
    #[must_use]
    pub fn apply(self, value: &Value) -> Option<Value> {
        match self {
            Coercion::Widen => {
                let widened = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }?;
                Number::from_f64(widened).map(Value::Number)
            }
            Coercion::Parse | Coercion::Truncate => match value {
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                Value::Number(n) => truncate(n).map(Value::from),
                _ => None,
            },
        }
    }
}

fn truncate(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let t = n.as_f64()?.trunc();
    if !t.is_finite() || t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return None;
    }
    Some(t as i64)
}

/// Machine-applicable rules for moving data from one version to the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationRuleSet {
    /// Version payloads are migrated from.
    pub from_version: String,
    /// Version payloads are migrated to.
    pub to_version: String,
    /// Old field name → new field name.
    pub field_renames: BTreeMap<String, String>,
    /// Fields that exist only in the newer version.
    pub added_fields: BTreeMap<String, AddedField>,
    /// Fields that exist only in the older version.
    pub removed_fields: BTreeSet<String>,
    /// Fields whose type tag changed.
    pub type_changes: BTreeMap<String, TypeChange>,
    /// Parent-set changes, as recorded in the delta.
    pub class_changes: BTreeMap<String, ClassChange>,
}

impl MigrationRuleSet {
    /// Derives the rules for `delta`, reading added-field ranges from
    /// `current`, the newer of the two models.
    pub fn synthesize(delta: &Delta, current: &SchemaModel) -> Self {
        let added_fields = delta
            .added_properties
            .iter()
            .map(|name| {
                let range = match current.property(name) {
                    Some(property) => property.range.clone(),
                    None => {
                        warn!(property = %name, "added property missing from current model");
                        PropertyRange::Scalar(ScalarKind::String)
                    }
                };
                let field = AddedField {
                    type_tag: range.type_tag().to_string(),
                    default: canonical_default(&range),
                };
                (name.clone(), field)
            })
            .collect();

        let type_changes = delta
            .changed_properties
            .iter()
            .filter_map(|(name, change)| {
                let range = change.range.as_ref()?;
                Some((
                    name.clone(),
                    TypeChange {
                        old: range.old.type_tag().to_string(),
                        new: range.new.type_tag().to_string(),
                    },
                ))
            })
            .collect();

        let rules = Self {
            from_version: delta.from_version.clone(),
            to_version: delta.to_version.clone(),
            field_renames: delta.renamed.clone(),
            added_fields,
            removed_fields: delta.removed_properties.clone(),
            type_changes,
            class_changes: delta.changed_classes.clone(),
        };
        debug!(
            from = %rules.from_version,
            to = %rules.to_version,
            renames = rules.field_renames.len(),
            added = rules.added_fields.len(),
            removed = rules.removed_fields.len(),
            type_changes = rules.type_changes.len(),
            "synthesized migration rules"
        );
        rules
    }

    /// True if every rule bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_renames.is_empty()
            && self.added_fields.is_empty()
            && self.removed_fields.is_empty()
            && self.type_changes.is_empty()
            && self.class_changes.is_empty()
    }

    /// Brings a payload recorded at `payload_version` up to
    /// [`to_version`](Self::to_version).
    ///
    /// Payloads already at the current version are returned untouched.
    /// Otherwise, for every entity object: renames are applied, removed
    /// fields are dropped, missing added fields receive their defaults, then
    /// type changes are coerced.
    /// A value that cannot be coerced takes the added-field default for the
    /// same name if there is one, else `null`. Never fails.
    #[must_use]
    pub fn migrate(&self, payload: Value, payload_version: &str) -> Value {
        if payload_version == self.to_version {
            return payload;
        }
        let Value::Object(mut entities) = payload else {
            debug!("payload is not an entity map; leaving it unchanged");
            return payload;
        };
        for entity in entities.values_mut() {
            let Value::Object(fields) = entity else {
                continue;
            };
            self.rename_fields(fields);
            self.drop_removed(fields);
            self.inject_defaults(fields);
            self.coerce_types(fields);
        }
        Value::Object(entities)
    }

    fn rename_fields(&self, fields: &mut Map<String, Value>) {
        for (old, new) in &self.field_renames {
            if let Some(value) = fields.remove(old) {
                fields.insert(new.clone(), value);
            }
        }
    }

    fn drop_removed(&self, fields: &mut Map<String, Value>) {
        for name in &self.removed_fields {
            fields.remove(name);
        }
    }

    fn inject_defaults(&self, fields: &mut Map<String, Value>) {
        for (name, added) in &self.added_fields {
            fields
                .entry(name.clone())
                .or_insert_with(|| added.default.clone());
        }
    }

    fn coerce_types(&self, fields: &mut Map<String, Value>) {
        for (name, change) in &self.type_changes {
            let Some(coercion) = Coercion::between(&change.old, &change.new) else {
                continue;
            };
            let Some(value) = fields.get_mut(name) else {
                continue;
            };
            *value = match coercion.apply(value) {
                Some(converted) => converted,
                None => {
                    debug!(field = %name, ?coercion, "coercion failed; using fallback");
                    self.added_fields
                        .get(name)
                        .map_or(Value::Null, |added| added.default.clone())
                }
            };
        }
    }
}
