//! Full conversions against ontology files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use owlgen_clients::{convert, ConversionConfig, MigrationStatus, PipelineError};
use owlgen_codegen::Target;
use tempfile::TempDir;

const V1: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix :     <http://example.org/university#> .

<http://example.org/university> a owl:Ontology ; owl:versionInfo "1.0.0" .
:University a owl:Class .
:Classroom a owl:Class .
:established a owl:DatatypeProperty ; rdfs:domain :University ;
  rdfs:range xsd:integer ; rdfs:label "founded_year" .
:capacity a owl:DatatypeProperty ; rdfs:domain :Classroom ; rdfs:range xsd:string .
"#;

const V2: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xml:base="http://example.org/university">
  <owl:Ontology rdf:about="http://example.org/university">
    <owl:versionInfo>1.1.0</owl:versionInfo>
  </owl:Ontology>
  <owl:Class rdf:about="http://example.org/university#University"/>
  <owl:Class rdf:about="http://example.org/university#Classroom"/>
  <owl:DatatypeProperty rdf:about="http://example.org/university#established">
    <rdfs:domain rdf:resource="http://example.org/university#University"/>
    <rdfs:range rdf:resource="http://www.w3.org/2001/XMLSchema#integer"/>
    <rdfs:label>founding_year</rdfs:label>
  </owl:DatatypeProperty>
  <owl:DatatypeProperty rdf:about="http://example.org/university#capacity">
    <rdfs:domain rdf:resource="http://example.org/university#Classroom"/>
    <rdfs:range rdf:resource="http://www.w3.org/2001/XMLSchema#integer"/>
  </owl:DatatypeProperty>
  <owl:DatatypeProperty rdf:about="http://example.org/university#hasProjector">
    <rdfs:domain rdf:resource="http://example.org/university#Classroom"/>
    <rdfs:range rdf:resource="http://www.w3.org/2001/XMLSchema#boolean"/>
  </owl:DatatypeProperty>
</rdf:RDF>
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("fixture written");
        path
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn config(&self, ontology: &Path) -> ConversionConfig {
        ConversionConfig::new(ontology).with_output(self.out())
    }
}

#[test]
fn python_model_without_previous() {
    let ws = Workspace::new();
    let onto = ws.file("university.owl", V1);

    let outcome = convert(&ws.config(&onto), Target::Python).expect("converts");
    assert_eq!(outcome.migration, MigrationStatus::NotRequested);
    assert_eq!(outcome.artifact_root(), ws.out().join("university_v1_0_0"));

    let root = outcome.artifact_root();
    assert!(root.join("ontology_model.py").is_file());
    assert!(!root.join("compatibility.py").exists());
    assert!(!root.join("CHANGES.md").exists());
}

#[test]
fn python_migration_from_previous() {
    let ws = Workspace::new();
    let old = ws.file("university_v1.owl", V1);
    let new = ws.file("university.owl", V2);

    let config = ws.config(&new).with_previous(&old);
    let outcome = convert(&config, Target::Python).expect("converts");
    assert_eq!(
        outcome.migration,
        MigrationStatus::Generated {
            from_version: "1.0.0".to_string()
        }
    );
    assert!(outcome.report.with_migration);

    let root = ws.out().join("university_v1_1_0");
    let adapter = fs::read_to_string(root.join("compatibility.py")).expect("adapter");
    assert!(adapter.contains("\"established\": \"founding_year\""));
    assert!(adapter.contains("\"hasProjector\""));

    let changes = fs::read_to_string(root.join("CHANGES.md")).expect("changelog");
    assert!(changes.contains("## From 1.0.0 to 1.1.0"));
    assert!(changes.contains("- `established` → `founding_year`"));
    assert!(changes.contains("- `hasProjector` (boolean) - default: `false`"));
    assert!(changes.contains("- `capacity`: string → integer"));
}

#[test]
fn missing_previous_skips_migration() {
    let ws = Workspace::new();
    let new = ws.file("university.owl", V2);
    let config = ws.config(&new).with_previous(ws.dir.path().join("gone.owl"));

    let outcome = convert(&config, Target::Cpp).expect("still converts");
    assert!(matches!(outcome.migration, MigrationStatus::Skipped { .. }));

    let root = outcome.artifact_root();
    assert!(root.join("include/ontology_model.hpp").is_file());
    assert!(!root.join("include/ontology_adapter.hpp").exists());
    assert!(!root.join("CHANGES.md").exists());
}

#[test]
fn unparsable_previous_skips_migration() {
    let ws = Workspace::new();
    let old = ws.file("broken.owl", "this is not an ontology");
    let new = ws.file("university.owl", V2);

    let outcome = convert(&ws.config(&new).with_previous(&old), Target::Python)
        .expect("still converts");
    match outcome.migration {
        MigrationStatus::Skipped { reason } => assert!(reason.contains("parse"), "{reason}"),
        other => panic!("expected a skip, got {other:?}"),
    }
}

#[test]
fn java_layout_with_prefix_and_version_override() {
    let ws = Workspace::new();
    let old = ws.file("university_v1.owl", V1);
    let new = ws.file("university.owl", V2);
    let config = ws
        .config(&new)
        .with_previous(&old)
        .with_prefix("campus")
        .with_version("2.0");
    let target = Target::Java {
        package: "org.example.campus".to_string(),
    };

    let outcome = convert(&config, target).expect("converts");
    assert_eq!(outcome.version, "2.0");

    let root = ws.out().join("campus_v2_0");
    let sources = root.join("src/main/java/org/example/campus");
    assert!(sources.join("University.java").is_file());
    assert!(sources.join("Classroom.java").is_file());
    assert!(sources.join("OntologyAdapter.java").is_file());
    let pom = fs::read_to_string(root.join("pom.xml")).expect("pom");
    assert!(pom.contains("<artifactId>campus</artifactId>"));
    assert!(pom.contains("<version>2.0</version>"));
}

#[test]
fn rejects_non_owl_input() {
    let ws = Workspace::new();
    let ttl = ws.file("university.ttl", V1);
    let err = convert(&ws.config(&ttl), Target::Python).expect_err("rejected");
    assert!(matches!(err, PipelineError::Validation { .. }));
    assert!(!ws.out().exists());
}

#[test]
fn malformed_ontology_is_a_parse_error() {
    let ws = Workspace::new();
    let onto = ws.file("university.owl", "@prefix : <http://example.org/u#> .\n:Person a");
    let err = convert(&ws.config(&onto), Target::Python).expect_err("rejected");
    assert!(matches!(err, PipelineError::Parse(_)), "{err}");
}
