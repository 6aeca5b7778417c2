//! `CHANGES.md`: the human-readable view of a migration rule set.

use std::fmt::Write as FmtWrite;

use owlgen_evolution::MigrationRuleSet;

/// Changelog file name, written at the artifact root.
pub const CHANGELOG_FILE: &str = "CHANGES.md";

/// Renders the migration guide. Empty rule buckets are omitted.
#[must_use]
pub fn render(rules: &MigrationRuleSet) -> String {
    let mut out = String::new();
    out.push_str("# Ontology Version Migration Guide\n\n");
    let _ = writeln!(out, "## From {} to {}", rules.from_version, rules.to_version);

    if rules.is_empty() {
        out.push_str("\nNo schema changes.\n");
        return out;
    }

    if !rules.field_renames.is_empty() {
        out.push_str("\n### Renamed Fields\n\n");
        for (old, new) in &rules.field_renames {
            let _ = writeln!(out, "- `{old}` → `{new}`");
        }
    }

    if !rules.added_fields.is_empty() {
        out.push_str("\n### Added Fields\n\n");
        for (name, added) in &rules.added_fields {
            let _ = writeln!(
                out,
                "- `{name}` ({}) - default: `{}`",
                added.type_tag, added.default
            );
        }
    }

    if !rules.removed_fields.is_empty() {
        out.push_str("\n### Removed Fields\n\n");
        for name in &rules.removed_fields {
            let _ = writeln!(out, "- `{name}`");
        }
    }

    if !rules.type_changes.is_empty() {
        out.push_str("\n### Type Changes\n\n");
        for (name, change) in &rules.type_changes {
            let _ = writeln!(out, "- `{name}`: {} → {}", change.old, change.new);
        }
    }

    if !rules.class_changes.is_empty() {
        out.push_str("\n### Class Hierarchy Changes\n\n");
        for (class, change) in &rules.class_changes {
            let mut parts = Vec::new();
            if !change.added_parents.is_empty() {
                parts.push(format!("now extends {}", code_list(&change.added_parents)));
            }
            if !change.removed_parents.is_empty() {
                parts.push(format!("no longer extends {}", code_list(&change.removed_parents)));
            }
            let _ = writeln!(out, "- `{class}`: {}", parts.join("; "));
        }
    }

    out
}

fn code_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
