//! Java target: one class per file, a migration adapter and a Maven `pom.xml`.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use owlgen_evolution::MigrationRuleSet;
use owlgen_schema::ScalarKind;
use serde_json::Value;

use crate::emit::{normalize_comment, quoted, SourceFile};
use crate::ir::{ClassIr, FieldIr, FieldKind, ModelIr};
use crate::mapping::{upper_first, Target};
use crate::Artifact;

/// Adapter class file name.
pub const ADAPTER_FILE: &str = "OntologyAdapter.java";
/// Build descriptor file name, written at the artifact root.
pub const BUILD_FILE: &str = "pom.xml";

/// Renders every class, the adapter (with rules) and the build descriptor.
///
/// `artifact_id` names the Maven artifact.
pub fn render(
    ir: &ModelIr,
    rules: Option<&MigrationRuleSet>,
    package: &str,
    artifact_id: &str,
    source_root: &Path,
) -> Vec<Artifact> {
    let target = Target::Java {
        package: package.to_string(),
    };
    let mut artifacts: Vec<Artifact> = ir
        .classes
        .iter()
        .map(|class| {
            let file = format!("{}.java", target.identifier(&class.name));
            Artifact::new(
                source_root.join(file),
                class_file(&target, ir, class, package),
            )
        })
        .collect();
    if let Some(rules) = rules {
        artifacts.push(Artifact::new(
            source_root.join(ADAPTER_FILE),
            adapter_file(rules, package),
        ));
    }
    artifacts.push(Artifact::new(
        Path::new(BUILD_FILE).to_path_buf(),
        pom(package, artifact_id, &ir.version),
    ));
    artifacts
}

fn header(version: &str) -> SourceFile {
    SourceFile::new(
        "//",
        &format!(
            "Auto-generated from OWL ontology version {version}.\nDo not edit: regenerate from the ontology instead."
        ),
    )
}

fn class_file(target: &Target, ir: &ModelIr, class: &ClassIr, package: &str) -> String {
    let mut f = header(&ir.version);
    let _ = writeln!(f.buf, "package {package};");
    f.blank();
    let has_collection = class
        .fields
        .iter()
        .any(|field| matches!(field.kind, FieldKind::Collection(_)));
    if has_collection {
        f.line("import java.util.ArrayList;");
        f.line("import java.util.List;");
        f.blank();
    }

    let name = target.identifier(&class.name);
    if let Some(comment) = &class.comment {
        let _ = writeln!(f.buf, "/** {} */", javadoc(comment));
    }
    match &class.parent {
        Some(parent) => {
            let _ = writeln!(f.buf, "public class {name} extends {} {{", target.identifier(parent));
        }
        None => {
            let _ = writeln!(f.buf, "public class {name} {{");
        }
    }

    for field in &class.fields {
        if let Some(comment) = &field.comment {
            let _ = writeln!(f.buf, "    /** {} */", javadoc(comment));
        }
        let _ = writeln!(
            f.buf,
            "    private {} {};",
            field_type(target, field),
            target.identifier(&field.name)
        );
    }
    if !class.fields.is_empty() {
        f.blank();
    }

    let _ = writeln!(f.buf, "    public {name}() {{");
    if class.parent.is_some() {
        f.line("        super();");
    }
    for field in &class.fields {
        let _ = writeln!(
            f.buf,
            "        this.{} = {};",
            target.identifier(&field.name),
            initializer(field)
        );
    }
    f.line("    }");

    for field in &class.fields {
        let ident = target.identifier(&field.name);
        let accessor = upper_first(&ident);
        let ty = field_type(target, field);
        f.blank();
        let _ = writeln!(f.buf, "    public {ty} get{accessor}() {{");
        let _ = writeln!(f.buf, "        return this.{ident};");
        f.line("    }");
        f.blank();
        let _ = writeln!(f.buf, "    public void set{accessor}({ty} {ident}) {{");
        let _ = writeln!(f.buf, "        this.{ident} = {ident};");
        f.line("    }");
    }

    f.blank();
    f.line("    @Override");
    f.line("    public String toString() {");
    let _ = writeln!(f.buf, "        return \"{name}{{\"");
    for (i, field) in class.fields.iter().enumerate() {
        let ident = target.identifier(&field.name);
        let separator = if i == 0 { "" } else { ", " };
        let _ = writeln!(f.buf, "            + \"{separator}{ident}=\" + {ident}");
    }
    if class.parent.is_some() {
        let separator = if class.fields.is_empty() { "" } else { ", " };
        let _ = writeln!(f.buf, "            + \"{separator}super=\" + super.toString()");
    }
    f.line("            + \"}\";");
    f.line("    }");
    f.line("}");
    f.finish()
}

fn field_type(target: &Target, field: &FieldIr) -> String {
    match &field.kind {
        FieldKind::Scalar(kind) => target.scalar_type(*kind).to_string(),
        FieldKind::Reference(class) => target.identifier(class),
        FieldKind::Collection(class) => format!("List<{}>", target.identifier(class)),
        FieldKind::Untyped => "Object".to_string(),
    }
}

fn initializer(field: &FieldIr) -> String {
    match &field.kind {
        FieldKind::Collection(_) => "new ArrayList<>()".to_string(),
        FieldKind::Scalar(ScalarKind::Float) => "0.0f".to_string(),
        _ => literal(&field.default),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quoted(s),
    }
}

/// Boxed literal for the adapter's `Map<String, Object>` tables.
fn boxed_literal(value: &Value) -> String {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => format!("{n}L"),
        other => literal(other),
    }
}

fn javadoc(text: &str) -> String {
    normalize_comment(text).replace("*/", "*&#47;")
}

fn adapter_file(rules: &MigrationRuleSet, package: &str) -> String {
    let mut f = header(&rules.to_version);
    let _ = writeln!(f.buf, "package {package};");
    f.blank();
    f.line("import java.util.LinkedHashMap;");
    f.line("import java.util.LinkedHashSet;");
    f.line("import java.util.List;");
    f.line("import java.util.Map;");
    f.line("import java.util.Objects;");
    f.line("import java.util.Set;");
    f.blank();
    let _ = writeln!(
        f.buf,
        "/** Migrates payloads recorded under {} to {}. */",
        rules.from_version, rules.to_version
    );
    f.line("public final class OntologyAdapter {");
    let _ = writeln!(
        f.buf,
        "    public static final String CURRENT_VERSION = {};",
        quoted(&rules.to_version)
    );
    let _ = writeln!(
        f.buf,
        "    public static final String PREVIOUS_VERSION = {};",
        quoted(&rules.from_version)
    );
    f.blank();
    f.line("    static final Map<String, String> FIELD_RENAMES = new LinkedHashMap<>();");
    f.line("    static final Map<String, String> ADDED_FIELD_TYPES = new LinkedHashMap<>();");
    f.line("    static final Map<String, Object> ADDED_FIELD_DEFAULTS = new LinkedHashMap<>();");
    f.line("    static final Set<String> REMOVED_FIELDS = new LinkedHashSet<>();");
    f.line("    static final Map<String, String[]> TYPE_CHANGES = new LinkedHashMap<>();");
    f.line("    static final Map<String, List<String>> ADDED_PARENTS = new LinkedHashMap<>();");
    f.line("    static final Map<String, List<String>> REMOVED_PARENTS = new LinkedHashMap<>();");
    f.blank();
    f.line("    static {");
    for (old, new) in &rules.field_renames {
        let _ = writeln!(f.buf, "        FIELD_RENAMES.put({}, {});", quoted(old), quoted(new));
    }
    for (name, added) in &rules.added_fields {
        let _ = writeln!(
            f.buf,
            "        ADDED_FIELD_TYPES.put({}, {});",
            quoted(name),
            quoted(&added.type_tag)
        );
        let _ = writeln!(
            f.buf,
            "        ADDED_FIELD_DEFAULTS.put({}, {});",
            quoted(name),
            boxed_literal(&added.default)
        );
    }
    for name in &rules.removed_fields {
        let _ = writeln!(f.buf, "        REMOVED_FIELDS.add({});", quoted(name));
    }
    for (name, change) in &rules.type_changes {
        let _ = writeln!(
            f.buf,
            "        TYPE_CHANGES.put({}, new String[] {{{}, {}}});",
            quoted(name),
            quoted(&change.old),
            quoted(&change.new)
        );
    }
    for (class, change) in &rules.class_changes {
        let _ = writeln!(
            f.buf,
            "        ADDED_PARENTS.put({}, List.of({}));",
            quoted(class),
            quoted_list(&change.added_parents)
        );
        let _ = writeln!(
            f.buf,
            "        REMOVED_PARENTS.put({}, List.of({}));",
            quoted(class),
            quoted_list(&change.removed_parents)
        );
    }
    f.line("    }");
    f.buf.push_str(ADAPTER_BODY);
    f.line("}");
    f.finish()
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(String::as_str)
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

// Mirrors `MigrationRuleSet::migrate` and `Coercion::apply`.
const ADAPTER_BODY: &str = r#"
    private OntologyAdapter() {
    }

    /** Brings an {@code entity -> field -> value} payload up to {@link #CURRENT_VERSION}. */
    public static Map<String, Map<String, Object>> migrate(
            Map<String, Map<String, Object>> payload, String payloadVersion) {
        if (Objects.equals(payloadVersion, CURRENT_VERSION)) {
            return payload;
        }
        Map<String, Map<String, Object>> migrated = new LinkedHashMap<>();
        for (Map.Entry<String, Map<String, Object>> entity : payload.entrySet()) {
            if (entity.getValue() == null) {
                migrated.put(entity.getKey(), null);
                continue;
            }
            Map<String, Object> fields = new LinkedHashMap<>(entity.getValue());
            for (Map.Entry<String, String> rename : FIELD_RENAMES.entrySet()) {
                if (fields.containsKey(rename.getKey())) {
                    fields.put(rename.getValue(), fields.remove(rename.getKey()));
                }
            }
            fields.keySet().removeAll(REMOVED_FIELDS);
            for (Map.Entry<String, Object> added : ADDED_FIELD_DEFAULTS.entrySet()) {
                if (!fields.containsKey(added.getKey())) {
                    fields.put(added.getKey(), added.getValue());
                }
            }
            for (Map.Entry<String, String[]> change : TYPE_CHANGES.entrySet()) {
                String name = change.getKey();
                if (fields.containsKey(name)) {
                    String[] types = change.getValue();
                    fields.put(name, coerce(name, fields.get(name), types[0], types[1]));
                }
            }
            migrated.put(entity.getKey(), fields);
        }
        return migrated;
    }

    static Object coerce(String name, Object value, String oldType, String newType) {
        Object fallback = ADDED_FIELD_DEFAULTS.get(name);
        boolean fromFloating = oldType.equals("float") || oldType.equals("double");
        boolean toFloating = newType.equals("float") || newType.equals("double");
        if (oldType.equals("integer") && toFloating) {
            double widened;
            if (value instanceof Number) {
                widened = ((Number) value).doubleValue();
            } else if (value instanceof String) {
                try {
                    widened = Double.parseDouble(((String) value).trim());
                } catch (NumberFormatException e) {
                    return fallback;
                }
            } else {
                return fallback;
            }
            return Double.isFinite(widened) ? widened : fallback;
        }
        if ((oldType.equals("string") || fromFloating) && newType.equals("integer")) {
            if (value instanceof Long || value instanceof Integer
                    || value instanceof Short || value instanceof Byte) {
                return ((Number) value).longValue();
            }
            if (value instanceof Number) {
                double d = ((Number) value).doubleValue();
                if (!Double.isFinite(d) || d < -9.223372036854775808E18 || d >= 9.223372036854775807E18) {
                    return fallback;
                }
                return (long) d;
            }
            if (value instanceof String) {
                try {
                    return Long.parseLong(((String) value).trim());
                } catch (NumberFormatException e) {
                    return fallback;
                }
            }
            return fallback;
        }
        return value;
    }
"#;

fn pom(package: &str, artifact_id: &str, version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <groupId>{package}</groupId>
    <artifactId>{artifact_id}</artifactId>
    <version>{version}</version>
    <packaging>jar</packaging>

    <properties>
        <maven.compiler.source>11</maven.compiler.source>
        <maven.compiler.target>11</maven.compiler.target>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
    </properties>
</project>
"#,
        package = xml_escape(package),
        artifact_id = xml_escape(artifact_id),
        version = xml_escape(version),
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use owlgen_evolution::{AddedField, TypeChange};
    use owlgen_schema::{ClassDescriptor, PropertyDescriptor, SchemaModel};
    use serde_json::json;
    use std::collections::BTreeMap;

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
                PropertyDescriptor::datatype("name", "Person", ScalarKind::String),
                PropertyDescriptor::datatype("ratio", "Course", ScalarKind::Float),
            ],
        ))
    }

    fn file<'a>(artifacts: &'a [Artifact], name: &str) -> &'a str {
        artifacts
            .iter()
            .find(|a| a.path.file_name().is_some_and(|f| f == name))
            .map_or("", |a| a.contents.as_str())
    }

    #[test]
    fn one_file_per_class_plus_pom() {
        let root = Path::new("src/main/java/org/uni");
        let artifacts = render(&ir(), None, "org.uni", "uni", root);
        let paths: Vec<String> = artifacts
            .iter()
            .map(|a| a.path.display().to_string())
            .collect();
        assert_eq!(
            paths,
            [
                "src/main/java/org/uni/Course.java",
                "src/main/java/org/uni/Person.java",
                "src/main/java/org/uni/Schedule.java",
                "src/main/java/org/uni/Student.java",
                "pom.xml",
            ]
        );
    }

    #[test]
    fn class_shapes() {
        let artifacts = render(&ir(), None, "org.uni", "uni", Path::new(""));
        let student = file(&artifacts, "Student.java");
        assert!(student.contains("package org.uni;\n"));
        assert_eq!(student.matches(" extends ").count(), 1);
        assert!(student.contains("public class Student extends Person {"));
        assert!(student.contains("+ \"super=\" + super.toString()"));

        let person = file(&artifacts, "Person.java");
        assert!(!person.contains(" extends "));
        assert!(person.contains("/** Base class for all people */\npublic class Person {"));
        assert!(person.contains("        this.name = \"\";"));

        let course = file(&artifacts, "Course.java");
        assert!(course.contains("import java.util.List;"));
        assert!(course.contains("    private Schedule schedule;"));
        assert!(course.contains("    private List<Course> prerequisite;"));
        assert!(course.contains("        this.prerequisite = new ArrayList<>();"));
        assert!(course.contains("        this.schedule = null;"));
        assert!(course.contains("        this.ratio = 0.0f;"));
        assert!(course.contains("    public Schedule getSchedule() {"));
        assert!(course.contains("            + \"schedule=\" + schedule\n            + \", prerequisite=\" + prerequisite"));
    }

    #[test]
    fn pom_names_artifact() {
        let artifacts = render(&ir(), None, "org.uni", "uni", Path::new(""));
        let pom = file(&artifacts, BUILD_FILE);
        assert!(pom.contains("<groupId>org.uni</groupId>"));
        assert!(pom.contains("<artifactId>uni</artifactId>"));
        assert!(pom.contains("<version>1.1.0</version>"));
    }

    #[test]
    fn adapter_embeds_rules_as_static_tables() {
        let rules = MigrationRuleSet {
            from_version: "1.0.0".to_string(),
            to_version: "1.1.0".to_string(),
            field_renames: BTreeMap::from([("established".to_string(), "founding_year".to_string())]),
            added_fields: BTreeMap::from([(
                "hasProjector".to_string(),
                AddedField {
                    type_tag: "boolean".to_string(),
                    default: json!(false),
                },
            )]),
            type_changes: BTreeMap::from([(
                "capacity".to_string(),
                TypeChange {
                    old: "string".to_string(),
                    new: "integer".to_string(),
                },
            )]),
            ..MigrationRuleSet::default()
        };
        let artifacts = render(&ir(), Some(&rules), "org.uni", "uni", Path::new(""));
        let adapter = file(&artifacts, ADAPTER_FILE);
        assert!(adapter.contains("FIELD_RENAMES.put(\"established\", \"founding_year\");"));
        assert!(adapter.contains("ADDED_FIELD_DEFAULTS.put(\"hasProjector\", false);"));
        assert!(adapter.contains("TYPE_CHANGES.put(\"capacity\", new String[] {\"string\", \"integer\"});"));
        assert!(adapter.contains("public static final String CURRENT_VERSION = \"1.1.0\";"));
    }
}
