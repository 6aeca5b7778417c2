//! Schema → target-language mapping tables.
//!
//! Deterministic mappings from scalar type tags to target type tokens, and
//! from ontology names to identifiers that are legal in each target.

use std::fmt;
use std::path::PathBuf;

use owlgen_schema::ScalarKind;

/// An output language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Python 3 dataclasses.
    Python,
    /// Java classes in the given package, built with Maven.
    Java {
        /// Dotted package name (e.g. `"org.example.university"`).
        package: String,
    },
    /// Header-only C++20.
    Cpp,
}

impl Target {
    /// Short lowercase name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Target::Python => "python",
            Target::Java { .. } => "java",
            Target::Cpp => "cpp",
        }
    }

    /// Maps a scalar type tag to this target's type token.
    ///
    /// Unknown tags fall back to [`generic_type`](Self::generic_type).
    #[must_use]
    pub fn map_scalar_type(&self, tag: &str) -> &'static str {
        match ScalarKind::from_tag(tag) {
            Some(kind) => self.scalar_type(kind),
            None => self.generic_type(),
        }
    }

    /// Type token for a scalar kind. Every kind maps to a distinct token.
    #[must_use]
    pub fn scalar_type(&self, kind: ScalarKind) -> &'static str {
        match self {
            Target::Python => match kind {
                ScalarKind::String => "str",
                ScalarKind::Integer => "int",
                ScalarKind::Float => "float",
                ScalarKind::Double => "Double",
                ScalarKind::Date => "date",
                ScalarKind::DateTime => "datetime",
                ScalarKind::Boolean => "bool",
            },
            Target::Java { .. } => match kind {
                ScalarKind::String => "String",
                ScalarKind::Integer => "int",
                ScalarKind::Float => "float",
                ScalarKind::Double => "double",
                ScalarKind::Date => "java.time.LocalDate",
                ScalarKind::DateTime => "java.time.LocalDateTime",
                ScalarKind::Boolean => "boolean",
            },
            Target::Cpp => match kind {
                ScalarKind::String => "std::string",
                ScalarKind::Integer => "int",
                ScalarKind::Float => "float",
                ScalarKind::Double => "double",
                ScalarKind::Date => "std::chrono::year_month_day",
                ScalarKind::DateTime => "std::chrono::system_clock::time_point",
                ScalarKind::Boolean => "bool",
            },
        }
    }

    /// Inverts [`scalar_type`](Self::scalar_type).
    #[must_use]
    pub fn scalar_for_type(&self, token: &str) -> Option<ScalarKind> {
        ScalarKind::ALL
            .into_iter()
            .find(|kind| self.scalar_type(*kind) == token)
    }

    /// The target's generic textual type.
    #[must_use]
    pub fn generic_type(&self) -> &'static str {
        match self {
            Target::Python => "str",
            Target::Java { .. } => "String",
            Target::Cpp => "std::string",
        }
    }

    /// Directory under the artifact root that holds model sources.
    #[must_use]
    pub fn source_root(&self) -> PathBuf {
        match self {
            Target::Python => PathBuf::new(),
            Target::Java { package } => {
                let mut root = PathBuf::from("src/main/java");
                root.extend(package.split('.').filter(|segment| !segment.is_empty()));
                root
            }
            Target::Cpp => PathBuf::from("include"),
        }
    }

    /// Makes `name` a legal identifier in this target. Anything other than a
    /// letter or digit becomes `_`, and a leading digit gains a `_` prefix.
    /// Reserved words gain a `_` suffix.
    #[must_use]
    pub fn identifier(&self, name: &str) -> String {
        let mut ident: String = name
            .chars()
            .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
            .collect();
        if ident.is_empty() || ident.starts_with(|ch: char| ch.is_ascii_digit()) {
            ident.insert(0, '_');
        }
        if self.reserved_words().contains(&ident.as_str()) {
            ident.push('_');
        }
        ident
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        match self {
            Target::Python => PYTHON_RESERVED,
            Target::Java { .. } => JAVA_RESERVED,
            Target::Cpp => CPP_RESERVED,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uppercases the first character (`"birthDate"` → `"BirthDate"`).
#[must_use]
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Python keywords plus names the generated module binds itself.
const PYTHON_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "field", "dataclass", "date", "datetime", "Any", "List",
    "Optional", "Double",
];

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "var", "record",
    "Object", "String", "OntologyAdapter",
];

const CPP_RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "constexpr", "continue", "decltype", "default", "delete", "do", "double",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "nullptr",
    "operator", "or", "private", "protected", "public", "register", "return", "short", "signed",
    "sizeof", "static", "struct", "switch", "template", "this", "throw", "true", "try",
    "typedef", "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "while",
    "xor", "to_string", "out", "detail",
];
