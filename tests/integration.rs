//! End-to-end tests: ontology files on disk through loading, detection and
//! rendering.

use std::path::{Path, PathBuf};

use onto_merge_check::detect::{Dimension, InverseRule};
use onto_merge_check::error::LoadError;
use onto_merge_check::graph::loader;
use onto_merge_check::{Category, DetectorConfig, Evidence, OntoError, analyze, detect};

const PREFIXES: &str = "\
@prefix ex: <http://ex.org/rail#> .
@prefix era: <http://data.europa.eu/949/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
";

fn write_ttl(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("{PREFIXES}\n{body}")).unwrap();
    path
}

#[test]
fn missing_source_is_skipped_with_a_warning() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(dir.path(), "a.ttl", "ex:Train a owl:Class ; rdfs:label \"Train\" .");
    let b = write_ttl(dir.path(), "b.ttl", "ex:Wagon a owl:Class ; rdfs:label \"Wagon\" .");
    let missing = dir.path().join("missing.ttl");

    let outcome = loader::load(&[a.clone(), missing.clone(), b.clone()]).unwrap();
    assert_eq!(outcome.sources.len(), 2);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].path, missing);
    assert!(matches!(outcome.warnings[0].error, LoadError::NotFound { .. }));

    let report = detect(&outcome.sources);
    assert_eq!(report.sources, vec!["a.ttl", "b.ttl"]);
    assert!(report.safe_to_merge());
}

#[test]
fn nothing_loadable_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let broken = dir.path().join("broken.ttl");
    std::fs::write(&broken, "this is not turtle at all").unwrap();
    let missing = dir.path().join("missing.ttl");

    let err = analyze(&[broken, missing], &DetectorConfig::default()).unwrap_err();
    assert!(matches!(err, OntoError::NoValidInput { attempted: 2 }));
}

#[test]
fn parse_failure_does_not_cancel_other_sources() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = write_ttl(dir.path(), "good.ttl", "ex:Track a owl:Class .");
    let broken = dir.path().join("broken.ttl");
    std::fs::write(&broken, "ex:Track a owl:Class").unwrap();

    let analysis = analyze(&[good, broken], &DetectorConfig::default()).unwrap();
    assert_eq!(analysis.outcome.sources.len(), 1);
    assert!(matches!(
        analysis.outcome.warnings[0].error,
        LoadError::Parse { .. }
    ));
}

#[test]
fn object_vs_datatype_property_is_critical() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(
        dir.path(),
        "vehicles.ttl",
        "ex:hasEngine a owl:ObjectProperty ; rdfs:range ex:Engine .",
    );
    let b = write_ttl(
        dir.path(),
        "specs.ttl",
        "ex:hasEngine a owl:DatatypeProperty ; rdfs:range xsd:string .",
    );

    let analysis = analyze(&[a, b], &DetectorConfig::default()).unwrap();
    let report = &analysis.report;
    assert!(!report.safe_to_merge());
    assert_eq!(report.count(Category::UriCollision), 1);
    assert_eq!(report.count(Category::PropertyTypeConflict), 1);

    let collision = report.findings_in(Category::UriCollision).next().unwrap();
    assert_eq!(collision.uris, vec!["http://ex.org/rail#hasEngine"]);
    assert_eq!(collision.sources, vec!["vehicles.ttl", "specs.ttl"]);
    let Evidence::Collision { conflicts } = &collision.evidence else {
        panic!("expected collision evidence");
    };
    let dimensions: Vec<Dimension> = conflicts.iter().map(|c| c.dimension).collect();
    assert_eq!(dimensions, vec![Dimension::Type, Dimension::Range]);

    let text = report.render();
    assert!(text.contains("2 CRITICAL conflicts found! These MUST be resolved before merging."));
}

#[test]
fn label_case_and_whitespace_do_not_collide() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(dir.path(), "a.ttl", "era:Vehicle a owl:Class ; rdfs:label \"Vehicle\" .");
    let b = write_ttl(dir.path(), "b.ttl", "era:Vehicle a owl:Class ; rdfs:label \"vehicle \" .");

    let report = analyze(&[a, b], &DetectorConfig::default()).unwrap().report;
    assert_eq!(report.count(Category::UriCollision), 0);
    assert_eq!(report.count(Category::SemanticDuplicate), 0);
    assert!(report.safe_to_merge());
    assert!(report.render().contains("No critical conflicts found. Safe to proceed with merging."));
}

#[test]
fn inverse_signals_are_paired_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(
        dir.path(),
        "signals.ttl",
        "ex:inputSignal a owl:ObjectProperty .\nex:outputSignal a owl:ObjectProperty .",
    );

    let report = analyze(&[a], &DetectorConfig::default()).unwrap().report;
    assert_eq!(report.count(Category::InverseProperty), 1);
    let finding = report.findings_in(Category::InverseProperty).next().unwrap();
    let Evidence::InversePair { rule, pattern, .. } = &finding.evidence else {
        panic!("expected inverse pair evidence");
    };
    assert_eq!(*rule, InverseRule::LocalName);
    assert_eq!(pattern, &("input".to_string(), "output".to_string()));
}

#[test]
fn namespace_agnostic_mode_groups_local_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(dir.path(), "ex.ttl", "ex:Vehicle a owl:Class .");
    let b = write_ttl(dir.path(), "era.ttl", "era:Vehicle a owl:Class .");

    let config = DetectorConfig {
        namespace_agnostic: true,
        ..DetectorConfig::default()
    };
    let report = analyze(&[a.clone(), b.clone()], &config).unwrap().report;
    assert_eq!(report.count(Category::NamespaceAgnosticGroup), 1);
    let text = report.render();
    assert!(text.contains("RUNNING IN NAMESPACE-AGNOSTIC MODE"));
    assert!(text.contains("NAMESPACE-AGNOSTIC URI GROUP"));
    assert!(text.contains("Local name 'vehicle'"));

    let plain = analyze(&[a, b], &DetectorConfig::default()).unwrap().report;
    assert_eq!(plain.count(Category::NamespaceAgnosticGroup), 0);
    assert!(!plain.render().contains("NAMESPACE-AGNOSTIC"));
}

#[test]
fn n_triples_are_detected_by_extension() {
    let dir = tempfile::TempDir::new().unwrap();
    let nt = dir.path().join("props.nt");
    std::fs::write(
        &nt,
        "<http://ex.org/rail#speed> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
         <http://www.w3.org/2002/07/owl#DatatypeProperty> .\n",
    )
    .unwrap();

    let report = analyze(&[nt], &DetectorConfig::default()).unwrap().report;
    assert_eq!(report.sources, vec!["props.nt"]);
    assert_eq!(report.count(Category::UnderspecifiedProperty), 1);
}

#[test]
fn json_report_round_trips_through_serde() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(dir.path(), "a.ttl", "ex:Bogie a owl:Class .");

    let report = analyze(&[a], &DetectorConfig::default()).unwrap().report;
    let json = report.to_json().unwrap();
    let parsed: onto_merge_check::Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn shared_blank_labels_do_not_collide() {
    let dir = tempfile::TempDir::new().unwrap();
    let a = write_ttl(
        dir.path(),
        "a.ttl",
        "_:b0 a owl:Class ; rdfs:label \"Engine restriction\" .",
    );
    let b = write_ttl(
        dir.path(),
        "b.ttl",
        "_:b0 a owl:ObjectProperty ; rdfs:label \"wheel link\" .",
    );

    let report = analyze(&[a, b], &DetectorConfig::default()).unwrap().report;
    assert_eq!(report.count(Category::UriCollision), 0);
    assert!(report.safe_to_merge());
}

#[test]
fn same_file_name_in_two_directories_counts_as_two_sources() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("core")).unwrap();
    std::fs::create_dir_all(dir.path().join("rail")).unwrap();
    let a = write_ttl(
        &dir.path().join("core"),
        "vehicles.ttl",
        "ex:Wagon a owl:Class ; rdfs:label \"Wagon\" .",
    );
    let b = write_ttl(
        &dir.path().join("rail"),
        "vehicles.ttl",
        "ex:Wagon a owl:Class ; rdfs:label \"Freight car\" .",
    );

    let report = analyze(&[a, b.clone()], &DetectorConfig::default()).unwrap().report;
    assert_eq!(report.sources.len(), 2);
    let collision = report.findings_in(Category::UriCollision).next().unwrap();
    assert_eq!(
        collision.sources,
        vec!["vehicles.ttl".to_string(), b.display().to_string()]
    );
}
