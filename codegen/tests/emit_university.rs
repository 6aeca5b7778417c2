//! Renders a university ontology for every target and writes it to disk.

use std::fs;

use owlgen_codegen::{Artifact, CodeEmitter, ModelIr, Target, VersionDirectoryPlanner};
use owlgen_evolution::{Delta, MigrationRuleSet};
use owlgen_schema::{OntologyGraph, SchemaExtractor, SchemaModel};

const PREAMBLE: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix :     <http://example.org/university#> .
"#;

const V1: &str = r#"
<http://example.org/university> a owl:Ontology ; owl:versionInfo "1.0.0" .
:Person a owl:Class .
:Student a owl:Class ; rdfs:subClassOf :Person .
:Professor a owl:Class ; rdfs:subClassOf :Person .
:Course a owl:Class .
:Schedule a owl:Class .
:name a owl:DatatypeProperty ; rdfs:domain :Person ; rdfs:range xsd:string .
:credits a owl:DatatypeProperty ; rdfs:domain :Course ; rdfs:range xsd:string .
:schedule a owl:ObjectProperty ; rdfs:domain :Course ; rdfs:range :Schedule .
"#;

const V2: &str = r#"
<http://example.org/university> a owl:Ontology ; owl:versionInfo "1.1.0" .
:Person a owl:Class ; rdfs:comment "Base class for all people" .
:Student a owl:Class ; rdfs:subClassOf :Person .
:Professor a owl:Class ; rdfs:subClassOf :Person .
:Course a owl:Class .
:Schedule a owl:Class .
:name a owl:DatatypeProperty ; rdfs:domain :Person ; rdfs:range xsd:string .
:credits a owl:DatatypeProperty ; rdfs:domain :Course ; rdfs:range xsd:integer .
:online a owl:DatatypeProperty ; rdfs:domain :Course ; rdfs:range xsd:boolean .
:schedule a owl:ObjectProperty ; rdfs:domain :Course ; rdfs:range :Schedule .
:prerequisite a owl:ObjectProperty ; rdfs:domain :Course ; rdfs:range :Course .
"#;

fn load(body: &str) -> SchemaModel {
    let graph = OntologyGraph::parse_str(&format!("{PREAMBLE}{body}")).expect("valid turtle");
    SchemaExtractor::new(&graph).extract(None).expect("extractable")
}

fn rules() -> MigrationRuleSet {
    let (old, new) = (load(V1), load(V2));
    MigrationRuleSet::synthesize(&Delta::compute(&old, &new), &new)
}

fn java() -> Target {
    Target::Java {
        package: "org.example.university".to_string(),
    }
}

fn contents<'a>(artifacts: &'a [Artifact], file: &str) -> &'a str {
    artifacts
        .iter()
        .find(|a| a.path.ends_with(file))
        .map(|a| a.contents.as_str())
        .unwrap_or_else(|| panic!("{file} not rendered"))
}

#[test]
fn subclasses_extend_person_exactly_once() {
    let model = load(V2);

    let py = CodeEmitter::new(Target::Python, "university")
        .render(&model, None)
        .expect("renders");
    let module = contents(&py, "ontology_model.py");
    assert!(module.contains("class Student(Person):"));
    assert!(module.contains("class Professor(Person):"));
    assert!(module.contains("class Person:\n"));

    let java = CodeEmitter::new(java(), "university")
        .render(&model, None)
        .expect("renders");
    for class in ["Student.java", "Professor.java"] {
        let source = contents(&java, class);
        assert_eq!(source.matches(" extends Person").count(), 1, "{class}");
    }
    assert!(!contents(&java, "Person.java").contains(" extends "));

    let cpp = CodeEmitter::new(Target::Cpp, "university")
        .render(&model, None)
        .expect("renders");
    let header = contents(&cpp, "ontology_model.hpp");
    assert!(header.contains("class Student : public Person {"));
    assert!(header.contains("class Professor : public Person {"));
    assert!(header.contains("class Person {"));
}

#[test]
fn references_and_collections() {
    let model = load(V2);

    let py = CodeEmitter::new(Target::Python, "university")
        .render(&model, None)
        .expect("renders");
    let module = contents(&py, "ontology_model.py");
    assert!(module.contains("    schedule: Optional[Schedule] = None\n"));
    assert!(module.contains("    prerequisite: List[Course] = field(default_factory=list)\n"));

    let java = CodeEmitter::new(java(), "university")
        .render(&model, None)
        .expect("renders");
    let course = contents(&java, "Course.java");
    assert!(course.contains("    private Schedule schedule;"));
    assert!(course.contains("    private List<Course> prerequisite;"));

    let cpp = CodeEmitter::new(Target::Cpp, "university")
        .render(&model, None)
        .expect("renders");
    let header = contents(&cpp, "ontology_model.hpp");
    assert!(header.contains("    std::shared_ptr<Schedule> schedule{};"));
    assert!(header.contains("    std::vector<std::shared_ptr<Course>> prerequisite{};"));
}

#[test]
fn rendering_is_repeatable() {
    let model = load(V2);
    let rules = rules();
    for target in [Target::Python, java(), Target::Cpp] {
        let emitter = CodeEmitter::new(target, "university");
        let first = emitter.render(&model, Some(&rules)).expect("renders");
        let second = emitter.render(&load(V2), Some(&rules)).expect("renders");
        assert_eq!(first, second, "{}", emitter.target());
    }
}

#[test]
fn migration_artifacts_for_every_target() {
    let model = load(V2);
    let rules = rules();
    let expected = [
        (Target::Python, "compatibility.py"),
        (java(), "OntologyAdapter.java"),
        (Target::Cpp, "ontology_adapter.hpp"),
    ];
    for (target, adapter) in expected {
        let artifacts = CodeEmitter::new(target.clone(), "university")
            .render(&model, Some(&rules))
            .expect("renders");
        assert!(!contents(&artifacts, adapter).is_empty());
        let changes = contents(&artifacts, "CHANGES.md");
        assert!(changes.contains("## From 1.0.0 to 1.1.0"));
        assert!(changes.contains("- `online` (boolean) - default: `false`"));
        assert!(changes.contains("- `credits`: string → integer"));

        let without = CodeEmitter::new(target, "university")
            .render(&model, None)
            .expect("renders");
        assert!(without.iter().all(|a| !a.path.ends_with("CHANGES.md")));
        assert!(without.iter().all(|a| !a.path.ends_with(adapter)));
    }
}

#[test]
fn only_java_has_a_build_descriptor() {
    let model = load(V2);
    for target in [Target::Python, java(), Target::Cpp] {
        let is_java = matches!(target, Target::Java { .. });
        let artifacts = CodeEmitter::new(target, "university")
            .render(&model, None)
            .expect("renders");
        assert_eq!(artifacts.iter().any(|a| a.path.ends_with("pom.xml")), is_java);
    }
}

#[test]
fn emit_writes_the_planned_layout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let model = load(V2);
    let rules = rules();
    let target = java();
    let layout = VersionDirectoryPlanner::new(dir.path()).plan(
        "university",
        Some("uni"),
        model.version(),
        &target,
    );

    let emitter = CodeEmitter::new(target, layout.artifact_name.clone());
    let report = emitter.emit(&layout, &model, Some(&rules)).expect("emits");
    assert_eq!(report.class_count, 5);
    assert!(report.with_migration);

    let root = dir.path().join("uni_v1_1_0");
    assert!(root.join("pom.xml").is_file());
    assert!(root.join("CHANGES.md").is_file());
    let sources = root.join("src/main/java/org/example/university");
    for file in ["Person.java", "Student.java", "OntologyAdapter.java"] {
        assert!(sources.join(file).is_file(), "{file}");
    }
    let pom = fs::read_to_string(root.join("pom.xml")).expect("pom written");
    assert!(pom.contains("<artifactId>uni</artifactId>"));

    // A second run over the same layout overwrites in place.
    let again = emitter.emit(&layout, &model, Some(&rules)).expect("emits again");
    assert_eq!(again.files, report.files);
}

#[test]
fn written_files_match_the_rendered_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let model = load(V2);
    let rules = rules();
    let layout = VersionDirectoryPlanner::new(dir.path()).plan(
        "university",
        None,
        model.version(),
        &Target::Python,
    );
    let emitter = CodeEmitter::new(Target::Python, layout.artifact_name.clone());

    let rendered = emitter.render(&model, Some(&rules)).expect("renders");
    let report = emitter.emit(&layout, &model, Some(&rules)).expect("emits");

    let ir = ModelIr::build(&model);
    assert_eq!(report.class_count, ir.classes.len());
    assert_eq!(report.field_count, ir.field_count());
    assert_eq!(report.files.len(), rendered.len());
    for artifact in &rendered {
        let path = layout.artifact_root.join(&artifact.path);
        assert!(report.files.contains(&path), "{}", path.display());
        let written = fs::read_to_string(&path).expect("written");
        assert_eq!(written, artifact.contents, "{}", path.display());
    }
}
