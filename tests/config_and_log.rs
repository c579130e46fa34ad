//! Detector config files and conflict logs on disk.

use chrono::NaiveDate;

use onto_merge_check::config::DetectorConfig;
use onto_merge_check::error::ConfigError;
use onto_merge_check::{Category, analyze, paths};

#[test]
fn config_file_drives_detection() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("detector.toml");
    std::fs::write(
        &config_path,
        r#"
domain_conflicts = false
extra_inverse_patterns = [["drives", "drivenBy"]]
"#,
    )
    .unwrap();
    let config = DetectorConfig::load(&config_path).unwrap();
    assert!(!config.domain_conflicts);
    assert!(!config.namespace_agnostic);

    let ttl = |name: &str, body: &str| {
        let path = dir.path().join(name);
        std::fs::write(
            &path,
            format!(
                "@prefix ex: <http://ex.org/fleet#> .\n\
                 @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
                 @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n{body}"
            ),
        )
        .unwrap();
        path
    };
    let a = ttl(
        "a.ttl",
        "ex:drivesCar a owl:ObjectProperty ; rdfs:domain ex:Person .\n\
         ex:carDrivenBy a owl:ObjectProperty ; rdfs:range ex:Person .",
    );
    let b = ttl("b.ttl", "ex:drivesCar a owl:ObjectProperty ; rdfs:domain ex:Robot .");

    let report = analyze(&[a.clone(), b.clone()], &config).unwrap().report;
    assert_eq!(report.count(Category::UriCollision), 0);
    assert_eq!(report.count(Category::InverseProperty), 1);

    let strict = analyze(&[a, b], &DetectorConfig::default()).unwrap().report;
    assert_eq!(strict.count(Category::UriCollision), 1);
    assert_eq!(strict.count(Category::InverseProperty), 0);
}

#[test]
fn malformed_config_is_a_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("detector.toml");
    std::fs::write(&path, "list_limit = \"lots\"").unwrap();
    assert!(matches!(
        DetectorConfig::load(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn log_is_written_under_output_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let onto = dir.path().join("rail.ttl");
    std::fs::write(
        &onto,
        "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
         <http://ex.org/rail#Track> a owl:Class .\n",
    )
    .unwrap();
    let report = analyze(&[onto], &DetectorConfig::default()).unwrap().report;

    let now = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let logs = dir.path().join("logs");
    let log_path = paths::log_file_path(&logs, None, &report.sources, &now);
    assert_eq!(
        log_path.file_name().unwrap(),
        "conflict_analysis_rail_20250102_030405.log"
    );

    let text = report.render();
    paths::write_log(&log_path, &report.sources, &now, &text).unwrap();
    let content = std::fs::read_to_string(&log_path).unwrap();
    assert!(content.starts_with("CONFLICT ANALYSIS LOG - 2025-01-02 03:04:05\n"));
    assert!(content.ends_with(&text));
}
