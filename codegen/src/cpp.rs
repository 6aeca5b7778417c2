//! C++ target: a model header and a migration-adapter header.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use owlgen_evolution::MigrationRuleSet;
use owlgen_schema::ScalarKind;
use serde_json::Value;

use crate::emit::{normalize_comment, quoted, SourceFile};
use crate::ir::{ClassIr, FieldIr, FieldKind, ModelIr};
use crate::mapping::Target;
use crate::Artifact;

/// Model header file name.
pub const MODEL_FILE: &str = "ontology_model.hpp";
/// Adapter header file name.
pub const ADAPTER_FILE: &str = "ontology_adapter.hpp";
/// Namespace every generated declaration lives in.
pub const NAMESPACE: &str = "ontology";

const TARGET: Target = Target::Cpp;

/// Renders the model header and, with rules, the adapter header.
pub fn render(ir: &ModelIr, rules: Option<&MigrationRuleSet>, source_root: &Path) -> Vec<Artifact> {
    let mut artifacts = vec![Artifact::new(source_root.join(MODEL_FILE), model_header(ir))];
    if let Some(rules) = rules {
        artifacts.push(Artifact::new(
            source_root.join(ADAPTER_FILE),
            adapter_header(rules),
        ));
    }
    artifacts
}

fn header(version: &str) -> SourceFile {
    let mut f = SourceFile::new(
        "//",
        &format!(
            "Auto-generated from OWL ontology version {version}.\nDo not edit: regenerate from the ontology instead."
        ),
    );
    f.line("#pragma once");
    f.blank();
    f
}

fn model_header(ir: &ModelIr) -> String {
    let mut f = header(&ir.version);
    for include in ["any", "chrono", "memory", "optional", "ostream", "sstream", "string", "vector"] {
        let _ = writeln!(f.buf, "#include <{include}>");
    }
    f.blank();
    let _ = writeln!(f.buf, "namespace {NAMESPACE} {{");
    f.blank();
    let _ = writeln!(f.buf, "inline constexpr const char* ONTOLOGY_VERSION = {};", quoted(&ir.version));
    f.blank();
    f.buf.push_str(DESCRIBE_HELPERS);
    f.blank();

    for class in &ir.classes {
        let _ = writeln!(f.buf, "class {};", TARGET.identifier(&class.name));
    }
    for class in &ir.classes {
        f.blank();
        render_class(&mut f, class);
    }
    f.blank();
    let _ = writeln!(f.buf, "}}  // namespace {NAMESPACE}");
    f.finish()
}

const DESCRIBE_HELPERS: &str = r#"namespace detail {

inline void describe(std::ostream& out, const std::string& value) { out << '"' << value << '"'; }
inline void describe(std::ostream& out, bool value) { out << (value ? "true" : "false"); }
inline void describe(std::ostream& out, int value) { out << value; }
inline void describe(std::ostream& out, float value) { out << value; }
inline void describe(std::ostream& out, double value) { out << value; }

inline void describe(std::ostream& out, const std::chrono::year_month_day& value) {
    out << static_cast<int>(value.year()) << '-' << static_cast<unsigned>(value.month()) << '-'
        << static_cast<unsigned>(value.day());
}

inline void describe(std::ostream& out, const std::chrono::system_clock::time_point& value) {
    out << std::chrono::duration_cast<std::chrono::seconds>(value.time_since_epoch()).count() << 's';
}

inline void describe(std::ostream& out, const std::any& value) { out << (value.has_value() ? "<set>" : "null"); }

template <typename T>
void describe(std::ostream& out, const std::optional<T>& value) {
    if (value) {
        describe(out, *value);
    } else {
        out << "null";
    }
}

template <typename T>
void describe(std::ostream& out, const std::shared_ptr<T>& value) {
    out << (value ? "<set>" : "null");
}

template <typename T>
void describe(std::ostream& out, const std::vector<std::shared_ptr<T>>& value) {
    out << '[' << value.size() << " items]";
}

}  // namespace detail
"#;

fn render_class(f: &mut SourceFile, class: &ClassIr) {
    let name = TARGET.identifier(&class.name);
    let parent = class.parent.as_deref().map(|p| TARGET.identifier(p));
    if let Some(comment) = &class.comment {
        let _ = writeln!(f.buf, "/// {}", normalize_comment(comment));
    }
    match &parent {
        Some(parent) => {
            let _ = writeln!(f.buf, "class {name} : public {parent} {{");
        }
        None => {
            let _ = writeln!(f.buf, "class {name} {{");
        }
    }
    f.line("public:");
    let _ = writeln!(f.buf, "    {name}() = default;");
    if parent.is_some() {
        let _ = writeln!(f.buf, "    ~{name}() override = default;");
    } else {
        let _ = writeln!(f.buf, "    virtual ~{name}() = default;");
    }
    if !class.fields.is_empty() {
        f.blank();
    }
    for field in &class.fields {
        let declaration = format!(
            "    {} {}{};",
            field_type(field),
            TARGET.identifier(&field.name),
            initializer(field)
        );
        match &field.comment {
            Some(comment) => {
                let _ = writeln!(f.buf, "{declaration}  // {}", normalize_comment(comment));
            }
            None => f.line(&declaration),
        }
    }
    f.blank();
    if parent.is_some() {
        f.line("    std::string to_string() const override {");
    } else {
        f.line("    virtual std::string to_string() const {");
    }
    f.line("        std::ostringstream out;");
    let _ = writeln!(f.buf, "        out << \"{name}{{\";");
    for (i, field) in class.fields.iter().enumerate() {
        let ident = TARGET.identifier(&field.name);
        let separator = if i == 0 { "" } else { ", " };
        let _ = writeln!(f.buf, "        out << \"{separator}{ident}=\";");
        let _ = writeln!(f.buf, "        detail::describe(out, {ident});");
    }
    if let Some(parent) = &parent {
        let separator = if class.fields.is_empty() { "" } else { ", " };
        let _ = writeln!(f.buf, "        out << \"{separator}super=\" << {parent}::to_string();");
    }
    f.line("        out << \"}\";");
    f.line("        return out.str();");
    f.line("    }");
    f.line("};");
}

fn field_type(field: &FieldIr) -> String {
    match &field.kind {
        // Dates have no meaningful zero value, so they start unset.
        FieldKind::Scalar(kind @ (ScalarKind::Date | ScalarKind::DateTime)) => {
            format!("std::optional<{}>", TARGET.scalar_type(*kind))
        }
        FieldKind::Scalar(kind) => TARGET.scalar_type(*kind).to_string(),
        FieldKind::Reference(class) => format!("std::shared_ptr<{}>", TARGET.identifier(class)),
        FieldKind::Collection(class) => {
            format!("std::vector<std::shared_ptr<{}>>", TARGET.identifier(class))
        }
        FieldKind::Untyped => "std::any".to_string(),
    }
}

fn initializer(field: &FieldIr) -> String {
    match (&field.kind, &field.default) {
        (FieldKind::Scalar(ScalarKind::Float), Value::Number(n)) => format!("{{{n}f}}"),
        (FieldKind::Scalar(_), Value::Number(n)) => format!("{{{n}}}"),
        (FieldKind::Scalar(_), Value::Bool(b)) => format!("{{{b}}}"),
        (FieldKind::Scalar(_), Value::String(s)) => format!("{{{}}}", quoted(s)),
        _ => "{}".to_string(),
    }
}

fn adapter_header(rules: &MigrationRuleSet) -> String {
    let mut f = header(&rules.to_version);
    for include in ["cerrno", "cmath", "cstdlib", "map", "optional", "set", "string", "utility", "variant", "vector"] {
        let _ = writeln!(f.buf, "#include <{include}>");
    }
    f.blank();
    let _ = writeln!(f.buf, "namespace {NAMESPACE} {{");
    f.blank();
    f.line("using FieldValue = std::variant<std::monostate, bool, long long, double, std::string>;");
    f.line("using Entity = std::map<std::string, FieldValue>;");
    f.line("using Payload = std::map<std::string, Entity>;");
    f.blank();
    f.line("struct TypeChange {");
    f.line("    std::string old_type;");
    f.line("    std::string new_type;");
    f.line("};");
    f.blank();
    f.line("struct ClassChange {");
    f.line("    std::vector<std::string> added_parents;");
    f.line("    std::vector<std::string> removed_parents;");
    f.line("};");
    f.blank();
    let _ = writeln!(
        f.buf,
        "/// Migrates payloads recorded under {} to {}.",
        rules.from_version, rules.to_version
    );
    f.line("class OntologyAdapter {");
    f.line("public:");
    let _ = writeln!(
        f.buf,
        "    static constexpr const char* CURRENT_VERSION = {};",
        quoted(&rules.to_version)
    );
    let _ = writeln!(
        f.buf,
        "    static constexpr const char* PREVIOUS_VERSION = {};",
        quoted(&rules.from_version)
    );

    table(
        &mut f,
        "std::map<std::string, std::string>",
        "field_renames",
        rules
            .field_renames
            .iter()
            .map(|(old, new)| format!("{{{}, {}}}", quoted(old), quoted(new))),
    );
    table(
        &mut f,
        "std::map<std::string, FieldValue>",
        "added_fields",
        rules
            .added_fields
            .iter()
            .map(|(name, added)| format!("{{{}, {}}}", quoted(name), field_value(&added.default))),
    );
    table(
        &mut f,
        "std::set<std::string>",
        "removed_fields",
        rules.removed_fields.iter().map(|name| quoted(name)),
    );
    table(
        &mut f,
        "std::map<std::string, TypeChange>",
        "type_changes",
        rules.type_changes.iter().map(|(name, change)| {
            format!(
                "{{{}, TypeChange{{{}, {}}}}}",
                quoted(name),
                quoted(&change.old),
                quoted(&change.new)
            )
        }),
    );
    table(
        &mut f,
        "std::map<std::string, ClassChange>",
        "class_changes",
        rules.class_changes.iter().map(|(name, change)| {
            format!(
                "{{{}, ClassChange{{{{{}}}, {{{}}}}}}}",
                quoted(name),
                quoted_list(&change.added_parents),
                quoted_list(&change.removed_parents)
            )
        }),
    );

    f.buf.push_str(ADAPTER_BODY);
    f.line("};");
    f.blank();
    let _ = writeln!(f.buf, "}}  // namespace {NAMESPACE}");
    f.finish()
}

/// Emits a static accessor returning a function-local constant table.
fn table(f: &mut SourceFile, ty: &str, name: &str, entries: impl Iterator<Item = String>) {
    f.blank();
    let _ = writeln!(f.buf, "    static const {ty}& {name}() {{");
    let _ = writeln!(f.buf, "        static const {ty} table{{");
    for entry in entries {
        let _ = writeln!(f.buf, "            {entry},");
    }
    f.line("        };");
    f.line("        return table;");
    f.line("    }");
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(String::as_str)
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => format!("FieldValue{{{b}}}"),
        Value::Number(n) if n.is_i64() || n.is_u64() => format!("FieldValue{{{n}LL}}"),
        Value::Number(n) => format!("FieldValue{{{n}}}"),
        Value::String(s) => format!("FieldValue{{std::string{{{}}}}}", quoted(s)),
        _ => "FieldValue{}".to_string(),
    }
}

// Mirrors `MigrationRuleSet::migrate` and `Coercion::apply`.
const ADAPTER_BODY: &str = r#"
    /// Brings an entity -> field -> value payload up to CURRENT_VERSION.
    static Payload migrate(Payload payload, const std::string& payload_version) {
        if (payload_version == CURRENT_VERSION) {
            return payload;
        }
        for (auto& [entity_name, fields] : payload) {
            for (const auto& [old_name, new_name] : field_renames()) {
                auto it = fields.find(old_name);
                if (it != fields.end()) {
                    FieldValue value = std::move(it->second);
                    fields.erase(it);
                    fields[new_name] = std::move(value);
                }
            }
            for (const auto& name : removed_fields()) {
                fields.erase(name);
            }
            for (const auto& [name, value] : added_fields()) {
                fields.emplace(name, value);
            }
            for (const auto& [name, change] : type_changes()) {
                auto it = fields.find(name);
                if (it != fields.end()) {
                    it->second = coerce(name, it->second, change);
                }
            }
        }
        return payload;
    }

private:
    static FieldValue fallback(const std::string& name) {
        auto it = added_fields().find(name);
        return it != added_fields().end() ? it->second : FieldValue{};
    }

    static std::optional<long long> parse_integer(const std::string& text) {
        const char* begin = text.c_str();
        char* end = nullptr;
        errno = 0;
        long long parsed = std::strtoll(begin, &end, 10);
        while (end != nullptr && (*end == ' ' || *end == '\t' || *end == '\n' || *end == '\r')) {
            ++end;
        }
        if (end == begin || end == nullptr || *end != '\0' || errno == ERANGE) {
            return std::nullopt;
        }
        return parsed;
    }

    static std::optional<double> parse_double(const std::string& text) {
        const char* begin = text.c_str();
        char* end = nullptr;
        errno = 0;
        double parsed = std::strtod(begin, &end);
        while (end != nullptr && (*end == ' ' || *end == '\t' || *end == '\n' || *end == '\r')) {
            ++end;
        }
        if (end == begin || end == nullptr || *end != '\0' || errno == ERANGE) {
            return std::nullopt;
        }
        return parsed;
    }

    static FieldValue coerce(const std::string& name, const FieldValue& value, const TypeChange& change) {
        const bool to_floating = change.new_type == "float" || change.new_type == "double";
        const bool from_floating = change.old_type == "float" || change.old_type == "double";
        if (change.old_type == "integer" && to_floating) {
            if (const auto* i = std::get_if<long long>(&value)) {
                return static_cast<double>(*i);
            }
            if (const auto* d = std::get_if<double>(&value)) {
                return std::isfinite(*d) ? FieldValue{*d} : fallback(name);
            }
            if (const auto* s = std::get_if<std::string>(&value)) {
                if (auto parsed = parse_double(*s); parsed && std::isfinite(*parsed)) {
                    return *parsed;
                }
            }
            return fallback(name);
        }
        if ((change.old_type == "string" || from_floating) && change.new_type == "integer") {
            if (const auto* i = std::get_if<long long>(&value)) {
                return *i;
            }
            if (const auto* d = std::get_if<double>(&value)) {
                const double t = std::trunc(*d);
                if (!std::isfinite(t) || t < -9223372036854775808.0 || t >= 9223372036854775808.0) {
                    return fallback(name);
                }
                return static_cast<long long>(t);
            }
            if (const auto* s = std::get_if<std::string>(&value)) {
                if (auto parsed = parse_integer(*s)) {
                    return *parsed;
                }
            }
            return fallback(name);
        }
        return value;
    }
"#;
