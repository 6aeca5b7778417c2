//! Two versions of a university ontology, diffed and migrated end to end.

use owlgen_evolution::{Delta, MigrationRuleSet, TypeChange};
use owlgen_schema::{OntologyGraph, SchemaExtractor, SchemaModel};
use serde_json::json;

const PREAMBLE: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix :     <http://example.org/uni#> .
"#;

const V1: &str = r#"
<http://example.org/uni> a owl:Ontology ; owl:versionInfo "1.0.0" .
:University a owl:Class .
:Classroom a owl:Class .
:Lab a owl:Class .
:established a owl:DatatypeProperty ; rdfs:domain :University ;
  rdfs:range xsd:integer ; rdfs:label "founded_year" .
:capacity a owl:DatatypeProperty ; rdfs:domain :Classroom ; rdfs:range xsd:string .
:fax a owl:DatatypeProperty ; rdfs:domain :University ; rdfs:range xsd:string .
"#;

const V2: &str = r#"
<http://example.org/uni> a owl:Ontology ; owl:versionInfo "1.1.0" .
:University a owl:Class .
:Building a owl:Class .
:Classroom a owl:Class ; rdfs:subClassOf :Building .
:established a owl:DatatypeProperty ; rdfs:domain :University ;
  rdfs:range xsd:integer ; rdfs:label "founding_year" .
:capacity a owl:DatatypeProperty ; rdfs:domain :Classroom ; rdfs:range xsd:integer .
:hasProjector a owl:DatatypeProperty ; rdfs:domain :Classroom ; rdfs:range xsd:boolean .
"#;

fn load(body: &str) -> SchemaModel {
    let graph = OntologyGraph::parse_str(&format!("{PREAMBLE}{body}")).expect("valid turtle");
    SchemaExtractor::new(&graph).extract(None).expect("extractable")
}

#[test]
fn self_diff_is_empty() {
    for model in [load(V1), load(V2)] {
        let delta = Delta::compute(&model, &model);
        assert!(delta.is_empty(), "unexpected changes: {delta:?}");
        assert!(MigrationRuleSet::synthesize(&delta, &model).is_empty());
    }
}

#[test]
fn delta_between_versions() {
    let delta = Delta::compute(&load(V1), &load(V2));
    assert_eq!(delta.from_version, "1.0.0");
    assert_eq!(delta.to_version, "1.1.0");
    assert!(delta.added_classes.contains("Building"));
    assert!(delta.removed_classes.contains("Lab"));
    assert!(delta.added_properties.contains("hasProjector"));
    assert!(delta.removed_properties.contains("fax"));
    assert_eq!(
        delta.changed_classes["Classroom"].added_parents,
        vec!["Building".to_string()]
    );
    assert!(delta.changed_properties["capacity"].range_changed());
    assert_eq!(
        delta.renamed.get("established").map(String::as_str),
        Some("founding_year")
    );
}

#[test]
fn synthesized_rules() {
    let new = load(V2);
    let rules = MigrationRuleSet::synthesize(&Delta::compute(&load(V1), &new), &new);

    assert_eq!(
        rules.field_renames.get("established").map(String::as_str),
        Some("founding_year")
    );
    let projector = &rules.added_fields["hasProjector"];
    assert_eq!(projector.type_tag, "boolean");
    assert_eq!(projector.default, json!(false));
    assert!(rules.removed_fields.contains("fax"));
    assert_eq!(
        rules.type_changes["capacity"],
        TypeChange {
            old: "string".to_string(),
            new: "integer".to_string(),
        }
    );
    assert!(rules.class_changes.contains_key("Classroom"));
}

#[test]
fn old_payload_migrates_to_new_shape() {
    let new = load(V2);
    let rules = MigrationRuleSet::synthesize(&Delta::compute(&load(V1), &new), &new);
    let payload = json!({
        "University": {"established": 1755, "fax": "555-0100"},
        "Classroom": {"capacity": "40"},
    });

    let migrated = rules.migrate(payload, "1.0.0");

    let university = &migrated["University"];
    assert_eq!(university["founding_year"], json!(1755));
    assert!(university.get("established").is_none());
    assert!(university.get("fax").is_none());

    let classroom = &migrated["Classroom"];
    assert_eq!(classroom["capacity"], json!(40));
    assert_eq!(classroom["hasProjector"], json!(false));
}
