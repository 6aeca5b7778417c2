//! Python target: one dataclass module plus a migration adapter.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use owlgen_evolution::MigrationRuleSet;
use serde_json::Value;

use crate::emit::{normalize_comment, quoted, SourceFile};
use crate::error::EmissionError;
use crate::ir::{ClassIr, FieldIr, FieldKind, ModelIr};
use crate::mapping::Target;
use crate::Artifact;

/// Model module file name.
pub const MODEL_FILE: &str = "ontology_model.py";
/// Adapter module file name.
pub const ADAPTER_FILE: &str = "compatibility.py";

const TARGET: Target = Target::Python;

/// Renders the model module and, with rules, the adapter module.
///
/// # Errors
///
/// Returns [`EmissionError::Rules`] if the rules cannot be serialized.
pub fn render(
    ir: &ModelIr,
    rules: Option<&MigrationRuleSet>,
    source_root: &Path,
) -> Result<Vec<Artifact>, EmissionError> {
    let mut artifacts = vec![Artifact::new(source_root.join(MODEL_FILE), model_module(ir))];
    if let Some(rules) = rules {
        artifacts.push(Artifact::new(
            source_root.join(ADAPTER_FILE),
            adapter_module(rules)?,
        ));
    }
    Ok(artifacts)
}

fn model_module(ir: &ModelIr) -> String {
    let mut f = SourceFile::new(
        "#",
        &format!(
            "Auto-generated from OWL ontology version {}.\nDo not edit: regenerate from the ontology instead.",
            ir.version
        ),
    );
    f.line("from __future__ import annotations");
    f.blank();
    f.line("from dataclasses import dataclass, field");
    f.line("from datetime import date, datetime");
    f.line("from typing import Any, List, Optional");
    f.blank();
    f.line("Double = float");
    f.line("\"\"\"Alias keeping `double` fields distinct from `float` ones.\"\"\"");
    f.blank();
    let _ = writeln!(f.buf, "__version__ = {}", quoted(&ir.version));
    let exported: Vec<String> = ir
        .classes
        .iter()
        .map(|class| quoted(&TARGET.identifier(&class.name)))
        .collect();
    let _ = writeln!(f.buf, "__all__ = [{}]", exported.join(", "));

    for class in &ir.classes {
        f.blank();
        f.line("");
        render_class(&mut f, class);
    }
    f.finish()
}

fn render_class(f: &mut SourceFile, class: &ClassIr) {
    let name = TARGET.identifier(&class.name);
    f.line("@dataclass");
    match &class.parent {
        Some(parent) => {
            let _ = writeln!(f.buf, "class {name}({}):", TARGET.identifier(parent));
        }
        None => {
            let _ = writeln!(f.buf, "class {name}:");
        }
    }
    if let Some(comment) = &class.comment {
        let _ = writeln!(f.buf, "    {}", docstring(comment));
    }
    if class.fields.is_empty() {
        if class.comment.is_none() {
            f.line("    pass");
        }
        return;
    }
    if class.comment.is_some() {
        f.blank();
    }
    for field in &class.fields {
        render_field(f, field);
    }
}

fn render_field(f: &mut SourceFile, field: &FieldIr) {
    let name = TARGET.identifier(&field.name);
    let declaration = match &field.kind {
        FieldKind::Scalar(kind) if field.default.is_null() => {
            format!("Optional[{}] = None", TARGET.scalar_type(*kind))
        }
        FieldKind::Scalar(kind) => {
            format!("{} = {}", TARGET.scalar_type(*kind), literal(&field.default))
        }
        FieldKind::Reference(class) => format!("Optional[{}] = None", TARGET.identifier(class)),
        FieldKind::Collection(class) => {
            format!("List[{}] = field(default_factory=list)", TARGET.identifier(class))
        }
        FieldKind::Untyped => "Optional[Any] = None".to_string(),
    };
    let _ = writeln!(f.buf, "    {name}: {declaration}");
    if let Some(comment) = &field.comment {
        let _ = writeln!(f.buf, "    {}", docstring(comment));
    }
}

fn adapter_module(rules: &MigrationRuleSet) -> Result<String, EmissionError> {
    let rules_json = serde_json::to_string_pretty(rules)?;
    let mut f = SourceFile::new(
        "#",
        &format!(
            "Auto-generated migration adapter: {} -> {}.\nDo not edit: regenerate from the ontology instead.",
            rules.from_version, rules.to_version
        ),
    );
    f.line("from __future__ import annotations");
    f.blank();
    f.line("import copy");
    f.line("import json");
    f.line("import math");
    f.line("import re");
    f.line("from dataclasses import asdict, fields");
    f.line("from typing import Any, Dict");
    f.blank();
    f.line("MIGRATION_RULES: Dict[str, Any] = json.loads(r\"\"\"");
    f.line(&rules_json);
    f.line("\"\"\")");
    f.blank();
    f.line("_INTEGER = re.compile(r\"[+-]?[0-9]+\")");
    f.line("_I64_MIN = -(2 ** 63)");
    f.line("_I64_MAX = 2 ** 63 - 1");
    f.blank();
    f.line("");
    f.line("class OntologyAdapter:");
    let _ = writeln!(
        f.buf,
        "    \"\"\"Migrates payloads recorded under {} to {}.\"\"\"",
        rules.from_version, rules.to_version
    );
    f.blank();
    let _ = writeln!(f.buf, "    CURRENT_VERSION = {}", quoted(&rules.to_version));
    let _ = writeln!(f.buf, "    PREVIOUS_VERSION = {}", quoted(&rules.from_version));
    f.buf.push_str(ADAPTER_BODY);
    Ok(f.finish())
}

// Mirrors `MigrationRuleSet::migrate` and `Coercion::apply`.
const ADAPTER_BODY: &str = r#"
    @classmethod
    def migrate(cls, payload: Dict[str, Any], payload_version: str) -> Dict[str, Any]:
        """Brings an `{entity: {field: value}}` payload up to CURRENT_VERSION."""
        if payload_version == cls.CURRENT_VERSION:
            return payload
        migrated = copy.deepcopy(payload)
        for entity in migrated.values():
            if not isinstance(entity, dict):
                continue
            for old_name, new_name in MIGRATION_RULES["field_renames"].items():
                if old_name in entity:
                    entity[new_name] = entity.pop(old_name)
            for name in MIGRATION_RULES["removed_fields"]:
                entity.pop(name, None)
            for name, added in MIGRATION_RULES["added_fields"].items():
                entity.setdefault(name, added["default"])
            for name, change in MIGRATION_RULES["type_changes"].items():
                if name in entity:
                    entity[name] = cls._coerce(name, entity[name], change["old"], change["new"])
        return migrated

    @staticmethod
    def _coerce(name: str, value: Any, old: str, new: str) -> Any:
        fallback = MIGRATION_RULES["added_fields"].get(name, {}).get("default")
        if old == "integer" and new in ("float", "double"):
            if isinstance(value, bool):
                return fallback
            if isinstance(value, (int, float)):
                widened = float(value)
            elif isinstance(value, str) and "_" not in value:
                try:
                    widened = float(value.strip())
                except ValueError:
                    return fallback
            else:
                return fallback
            return widened if math.isfinite(widened) else fallback
        if old in ("string", "float", "double") and new == "integer":
            if isinstance(value, bool):
                return fallback
            if isinstance(value, int):
                converted = value
            elif isinstance(value, float) and math.isfinite(value):
                converted = int(value)
            elif isinstance(value, str) and _INTEGER.fullmatch(value.strip()):
                converted = int(value.strip())
            else:
                return fallback
            return converted if _I64_MIN <= converted <= _I64_MAX else fallback
        return value

    @staticmethod
    def to_dict(obj: Any) -> Dict[str, Any]:
        return asdict(obj)

    @staticmethod
    def from_dict(data: Dict[str, Any], target_class: Any) -> Any:
        known = {f.name for f in fields(target_class)}
        return target_class(**{k: v for k, v in data.items() if k in known})
"#;

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quoted(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

fn docstring(text: &str) -> String {
    let text = normalize_comment(text)
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"");
    if text.ends_with('"') {
        format!("\"\"\"{text} \"\"\"")
    } else {
        format!("\"\"\"{text}\"\"\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owlgen_schema::{ClassDescriptor, PropertyDescriptor, ScalarKind, SchemaModel};

    fn ir() -> ModelIr {
        ModelIr::build(&SchemaModel::new(
            "1.1.0",
            vec![
                ClassDescriptor::new("Person").with_comment("Base class for all people"),
                ClassDescriptor::new("Student").with_parent("Person"),
                ClassDescriptor::new("Course"),
                ClassDescriptor::new("Schedule"),
            ],
            vec![
                PropertyDescriptor::object("schedule", "Course", "Schedule"),
                PropertyDescriptor::object("prerequisite", "Course", "Course"),
                PropertyDescriptor::datatype("name", "Person", ScalarKind::String)
                    .with_comment("Full name"),
                PropertyDescriptor::datatype("birthDate", "Person", ScalarKind::Date),
                PropertyDescriptor::datatype("weight", "Course", ScalarKind::Double),
                PropertyDescriptor::datatype("active", "Course", ScalarKind::Boolean),
            ],
        ))
    }

    #[test]
    fn model_module_shape() {
        let source = model_module(&ir());
        assert!(source.starts_with("# Auto-generated from OWL ontology version 1.1.0.\n"));
        assert!(source.contains("__all__ = [\"Course\", \"Person\", \"Schedule\", \"Student\"]"));
        assert!(source.contains("@dataclass\nclass Student(Person):\n    pass\n"));
        assert!(source.contains(
            "class Person:\n    \"\"\"Base class for all people\"\"\"\n\n    name: str = \"\"\n    \"\"\"Full name\"\"\"\n    birthDate: Optional[date] = None\n"
        ));
        assert!(source.contains("    schedule: Optional[Schedule] = None\n"));
        assert!(source.contains("    prerequisite: List[Course] = field(default_factory=list)\n"));
        assert!(source.contains("    weight: Double = 0.0\n"));
        assert!(source.contains("    active: bool = False\n"));
    }

    #[test]
    fn classes_are_separated_by_two_blank_lines() {
        let source = model_module(&ir());
        assert!(source.contains("__all__ = [\"Course\", \"Person\", \"Schedule\", \"Student\"]\n\n\n@dataclass\nclass Course:"));
        assert!(!source.contains("\n\n\n\n"));
    }

    #[test]
    fn adapter_embeds_rules() {
        let rules = MigrationRuleSet {
            from_version: "1.0.0".to_string(),
            to_version: "1.1.0".to_string(),
            ..MigrationRuleSet::default()
        };
        let artifacts = render(&ir(), Some(&rules), Path::new("")).unwrap_or_default();
        assert_eq!(artifacts.len(), 2);
        let adapter = &artifacts[1];
        assert_eq!(adapter.path, Path::new(ADAPTER_FILE));
        assert!(adapter.contents.contains("    CURRENT_VERSION = \"1.1.0\"\n"));
        assert!(adapter.contents.contains("\"field_renames\": {}"));
        assert!(adapter.contents.contains("def migrate(cls"));
    }

    #[test]
    fn docstrings_are_escaped() {
        assert_eq!(docstring("say \"\"\"hi\"\"\""), "\"\"\"say \\\"\\\"\\\"hi\\\"\\\"\\\" \"\"\"");
        assert_eq!(docstring("plain"), "\"\"\"plain\"\"\"");
    }
}
