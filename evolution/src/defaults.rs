//! Canonical default values per range.

use owlgen_schema::{PropertyRange, ScalarKind};
use serde_json::Value;

/// Returns the value a freshly added field takes when a payload lacks it.
///
/// Strings default to `""`, integers to `0`, floating-point kinds to `0.0`,
/// booleans to `false`. Dates, datetimes and object references have no
/// meaningful zero and default to `null`.
#[must_use]
pub fn canonical_default(range: &PropertyRange) -> Value {
    match range {
        PropertyRange::Scalar(kind) => scalar_default(*kind),
        PropertyRange::Class(_) | PropertyRange::Object => Value::Null,
    }
}

/// Returns the canonical default for a scalar kind.
#[must_use]
pub fn scalar_default(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::String => Value::String(String::new()),
        ScalarKind::Integer => Value::from(0_i64),
        ScalarKind::Float | ScalarKind::Double => Value::from(0.0_f64),
        ScalarKind::Boolean => Value::Bool(false),
        ScalarKind::Date | ScalarKind::DateTime => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_defaults() {
        assert_eq!(scalar_default(ScalarKind::String), json!(""));
        assert_eq!(scalar_default(ScalarKind::Integer), json!(0));
        assert_eq!(scalar_default(ScalarKind::Float), json!(0.0));
        assert_eq!(scalar_default(ScalarKind::Double), json!(0.0));
        assert_eq!(scalar_default(ScalarKind::Boolean), json!(false));
        assert_eq!(scalar_default(ScalarKind::Date), Value::Null);
        assert_eq!(scalar_default(ScalarKind::DateTime), Value::Null);
    }

    #[test]
    fn references_default_to_null() {
        assert_eq!(
            canonical_default(&PropertyRange::Class("Schedule".to_string())),
            Value::Null
        );
        assert_eq!(canonical_default(&PropertyRange::Object), Value::Null);
    }
}
