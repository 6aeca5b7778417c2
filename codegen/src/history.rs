//! Version history of previously generated output.
//!
//! Every `{name}_v{version}` directory under an output root is read back
//! into a per-class field listing. The versions of each ontology are then
//! ordered and neighbouring versions compared, which gives a report of how
//! the generated model evolved without access to the ontology files.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use owlgen_evolution::TypeChange;
use semver::Version;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::HistoryError;
use crate::mapping::Target;
use crate::planner::VERSION_MARKER;
use crate::{cpp, java, python};

/// Version assumed for a directory without a version suffix.
pub const UNVERSIONED: &str = "0.0.0";

/// Field name → declared type, as written in the generated source.
pub type FieldTypes = BTreeMap<String, String>;

/// Splits a directory name back into ontology name and version.
///
/// The split happens at the last `_v`, and underscores in the version turn
/// back into dots. A name without a version suffix gets [`UNVERSIONED`].
#[must_use]
pub fn split_directory_name(dir_name: &str) -> (String, String) {
    match dir_name.rsplit_once(VERSION_MARKER) {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => {
            (name.to_string(), version.replace('_', "."))
        }
        _ => (dir_name.to_string(), UNVERSIONED.to_string()),
    }
}

/// Sort key for a version string.
///
/// Valid semver is used as is. Anything else keeps its first three
/// dot-separated parts, padded with zeros, and a part that is not purely
/// numeric counts as zero.
#[must_use]
pub fn version_key(version: &str) -> Version {
    if let Ok(parsed) = Version::parse(version) {
        return parsed;
    }
    let mut parts = version.split('.').map(numeric_part);
    let major = parts.next().unwrap_or(0);
    let minor = parts.next().unwrap_or(0);
    let patch = parts.next().unwrap_or(0);
    Version::new(major, minor, patch)
}

fn numeric_part(part: &str) -> u64 {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    part.parse().unwrap_or(0)
}

/// The classes and fields of one generated version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSnapshot {
    /// Version taken from the directory name.
    pub version: String,
    /// Directory the model was read from.
    pub directory: PathBuf,
    /// Class name → its own fields.
    pub classes: BTreeMap<String, FieldTypes>,
}

impl ModelSnapshot {
    /// Reads the model generated into `artifact_root`.
    ///
    /// The target is recognised by its model file: `ontology_model.py`,
    /// `include/ontology_model.hpp`, or a `pom.xml` with Java sources.
    /// Returns `Ok(None)` when the directory holds none of them.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if a model file exists but cannot be read.
    pub fn read(
        artifact_root: &Path,
        version: impl Into<String>,
    ) -> Result<Option<Self>, HistoryError> {
        let python_model = artifact_root.join(python::MODEL_FILE);
        let cpp_model = artifact_root
            .join(Target::Cpp.source_root())
            .join(cpp::MODEL_FILE);

        let classes = if let Some(source) = read_if_present(&python_model)? {
            python_classes(&source)
        } else if let Some(source) = read_if_present(&cpp_model)? {
            cpp_classes(&source)
        } else if artifact_root.join(java::BUILD_FILE).is_file() {
            java_classes(artifact_root)?
        } else {
            return Ok(None);
        };
        Ok(Some(Self {
            version: version.into(),
            directory: artifact_root.to_path_buf(),
            classes,
        }))
    }
}

fn read_if_present(path: &Path) -> Result<Option<String>, HistoryError> {
    match fs::read_to_string(path) {
        Ok(source) => Ok(Some(source)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(HistoryError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads `@dataclass` classes and their annotated fields.
fn python_classes(source: &str) -> BTreeMap<String, FieldTypes> {
    let mut classes = BTreeMap::new();
    let mut current: Option<String> = None;
    for line in source.lines() {
        if let Some(header) = line.strip_prefix("class ") {
            let name = header
                .split(|c: char| c == '(' || c == ':')
                .next()
                .unwrap_or_default()
                .trim();
            classes.insert(name.to_string(), FieldTypes::new());
            current = Some(name.to_string());
            continue;
        }
        if !line.starts_with(' ') && !line.is_empty() {
            current = None;
            continue;
        }
        let (Some(class), Some(body)) = (&current, line.strip_prefix("    ")) else {
            continue;
        };
        let Some((name, annotation)) = body.split_once(": ") else {
            continue;
        };
        if !is_identifier(name) {
            continue;
        }
        let ty = annotation
            .split_once(" = ")
            .map_or(annotation, |(ty, _)| ty)
            .trim();
        if let Some(fields) = classes.get_mut(class) {
            fields.insert(name.to_string(), ty.to_string());
        }
    }
    classes
}

/// Reads class definitions from the model header. Forward declarations are
/// skipped; members are the brace-initialised declarations.
fn cpp_classes(source: &str) -> BTreeMap<String, FieldTypes> {
    let mut classes = BTreeMap::new();
    let mut current: Option<String> = None;
    for line in source.lines() {
        if let Some(header) = line.strip_prefix("class ") {
            if header.ends_with('{') {
                let name = header
                    .split(|c: char| c == ' ' || c == '{')
                    .next()
                    .unwrap_or_default();
                classes.insert(name.to_string(), FieldTypes::new());
                current = Some(name.to_string());
            }
            continue;
        }
        if line == "};" {
            current = None;
            continue;
        }
        let (Some(class), Some(body)) = (&current, line.strip_prefix("    ")) else {
            continue;
        };
        if body.starts_with(' ') {
            continue;
        }
        let code = body.split_once("  //").map_or(body, |(code, _)| code);
        let Some(declaration) = code.strip_suffix("};") else {
            continue;
        };
        let Some((declaration, _initializer)) = declaration.rsplit_once('{') else {
            continue;
        };
        let Some((ty, name)) = declaration.trim_end().rsplit_once(' ') else {
            continue;
        };
        if !is_identifier(name) {
            continue;
        }
        if let Some(fields) = classes.get_mut(class) {
            fields.insert(name.to_string(), ty.to_string());
        }
    }
    classes
}

/// Reads one class per `.java` file under `src/main/java`, skipping the
/// migration adapter.
fn java_classes(artifact_root: &Path) -> Result<BTreeMap<String, FieldTypes>, HistoryError> {
    let sources = artifact_root.join(
        Target::Java {
            package: String::new(),
        }
        .source_root(),
    );
    let mut classes = BTreeMap::new();
    if !sources.is_dir() {
        return Ok(classes);
    }
    for entry in WalkDir::new(&sources).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_model = path.extension().is_some_and(|ext| ext == "java")
            && entry.file_name() != java::ADAPTER_FILE;
        if !entry.file_type().is_file() || !is_model {
            continue;
        }
        let source = fs::read_to_string(path).map_err(|source| HistoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some((name, fields)) = java_class(&source) {
            classes.insert(name, fields);
        }
    }
    Ok(classes)
}

fn java_class(source: &str) -> Option<(String, FieldTypes)> {
    let mut lines = source.lines();
    let name = lines.by_ref().find_map(|line| {
        let header = line.strip_prefix("public class ")?;
        header.split(' ').next().map(str::to_string)
    })?;
    let fields = lines
        .filter_map(|line| line.strip_prefix("    private ")?.strip_suffix(';'))
        .filter_map(|declaration| declaration.rsplit_once(' '))
        .filter(|(_, name)| is_identifier(name))
        .map(|(ty, name)| (name.to_string(), ty.to_string()))
        .collect();
    Some((name, fields))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Field-level changes of a class present in both versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFieldChanges {
    /// Fields only in the newer version.
    pub added: BTreeSet<String>,
    /// Fields only in the older version.
    pub removed: BTreeSet<String>,
    /// Fields whose declared type differs.
    pub retyped: BTreeMap<String, TypeChange>,
}

impl ClassFieldChanges {
    fn between(old: &FieldTypes, new: &FieldTypes) -> Self {
        let retyped = old
            .iter()
            .filter_map(|(name, old_ty)| {
                let new_ty = new.get(name)?;
                (old_ty != new_ty).then(|| {
                    let change = TypeChange {
                        old: old_ty.clone(),
                        new: new_ty.clone(),
                    };
                    (name.clone(), change)
                })
            })
            .collect();
        Self {
            added: keys_missing_from(new, old),
            removed: keys_missing_from(old, new),
            retyped,
        }
    }

    /// True if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.retyped.is_empty()
    }
}

fn keys_missing_from<V>(from: &BTreeMap<String, V>, other: &BTreeMap<String, V>) -> BTreeSet<String> {
    from.keys()
        .filter(|name| !other.contains_key(*name))
        .cloned()
        .collect()
}

/// Differences between two neighbouring versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStep {
    /// Older version.
    pub from_version: String,
    /// Newer version.
    pub to_version: String,
    /// Classes only in the newer version.
    pub added_classes: BTreeSet<String>,
    /// Classes only in the older version.
    pub removed_classes: BTreeSet<String>,
    /// Classes in both versions whose fields changed.
    pub changed_classes: BTreeMap<String, ClassFieldChanges>,
}

impl VersionStep {
    /// Compares two snapshots.
    #[must_use]
    pub fn between(old: &ModelSnapshot, new: &ModelSnapshot) -> Self {
        let changed_classes = old
            .classes
            .iter()
            .filter_map(|(name, old_fields)| {
                let changes = ClassFieldChanges::between(old_fields, new.classes.get(name)?);
                (!changes.is_empty()).then(|| (name.clone(), changes))
            })
            .collect();
        Self {
            from_version: old.version.clone(),
            to_version: new.version.clone(),
            added_classes: keys_missing_from(&new.classes, &old.classes),
            removed_classes: keys_missing_from(&old.classes, &new.classes),
            changed_classes,
        }
    }

    /// True if the two versions generated the same model.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_classes.is_empty()
            && self.removed_classes.is_empty()
            && self.changed_classes.is_empty()
    }
}

/// Every generated version of one ontology, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyHistory {
    /// Prefix or ontology name from the directory names.
    pub name: String,
    /// Snapshots ordered by [`version_key`].
    pub snapshots: Vec<ModelSnapshot>,
}

impl OntologyHistory {
    /// Orders `snapshots` by version. Equal keys fall back to the version
    /// text, so the order never depends on directory listing order.
    #[must_use]
    pub fn new(name: impl Into<String>, mut snapshots: Vec<ModelSnapshot>) -> Self {
        snapshots.sort_by(|a, b| {
            version_key(&a.version)
                .cmp(&version_key(&b.version))
                .then_with(|| a.version.cmp(&b.version))
        });
        Self {
            name: name.into(),
            snapshots,
        }
    }

    /// Compares each version with the one before it.
    #[must_use]
    pub fn steps(&self) -> Vec<VersionStep> {
        self.snapshots
            .windows(2)
            .map(|pair| VersionStep::between(&pair[0], &pair[1]))
            .collect()
    }

    /// Renders the change report for this ontology.
    #[must_use]
    pub fn report(&self) -> String {
        render_report(&self.name, &self.steps())
    }
}

/// Groups every generated version directory under `output_root` by
/// ontology name. Histories are sorted by name.
///
/// # Errors
///
/// Returns a [`HistoryError`] if the root cannot be listed or a model file
/// cannot be read.
pub fn scan(output_root: &Path) -> Result<Vec<OntologyHistory>, HistoryError> {
    let list_err = |source| HistoryError::ListDir {
        path: output_root.to_path_buf(),
        source,
    };
    let mut grouped: BTreeMap<String, Vec<ModelSnapshot>> = BTreeMap::new();
    for entry in fs::read_dir(output_root).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let (name, version) = split_directory_name(&dir_name);
        match ModelSnapshot::read(&path, version)? {
            Some(snapshot) => grouped.entry(name).or_default().push(snapshot),
            None => debug!(directory = %path.display(), "no generated model, skipping"),
        }
    }
    let histories: Vec<OntologyHistory> = grouped
        .into_iter()
        .map(|(name, snapshots)| OntologyHistory::new(name, snapshots))
        .collect();
    info!(
        root = %output_root.display(),
        ontologies = histories.len(),
        "scanned generated versions"
    );
    Ok(histories)
}

/// Renders the report for one ontology's version steps.
#[must_use]
pub fn render_report(name: &str, steps: &[VersionStep]) -> String {
    if steps.is_empty() {
        return format!("No changes found between versions of ontology '{name}'.\n");
    }
    let mut out = format!("Report for ontology: {name}\n");
    for step in steps {
        let _ = writeln!(out, "\nChanges {} → {}:", step.from_version, step.to_version);
        if step.is_empty() {
            out.push_str("  (no changes)\n");
            continue;
        }
        if !step.added_classes.is_empty() {
            let _ = writeln!(out, "  + Added classes: {}", joined(&step.added_classes));
        }
        if !step.removed_classes.is_empty() {
            let _ = writeln!(out, "  - Removed classes: {}", joined(&step.removed_classes));
        }
        for (class, changes) in &step.changed_classes {
            let _ = writeln!(out, "\n  Changes in class {class}:");
            if !changes.added.is_empty() {
                let _ = writeln!(out, "    + Added fields: {}", joined(&changes.added));
            }
            if !changes.removed.is_empty() {
                let _ = writeln!(out, "    - Removed fields: {}", joined(&changes.removed));
            }
            for (field, change) in &changes.retyped {
                let _ = writeln!(out, "    ~ Field {field}: {} → {}", change.old, change.new);
            }
        }
    }
    out
}

fn joined(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
