//! End-to-end tests for the load → build → diff → output pipeline.

use std::path::{Path, PathBuf};
use step_tools::cli::{run_diff, run_tree};
use step_tools::config::TreeConfig;
use step_tools::error::LoadErrorKind;
use step_tools::pipeline::{compute_diff, exit_codes, load_step_file, read_step_file};
use step_tools::reports::ReportFormat;
use step_tools::{AppConfig, DiffConfig, DiffOutcome, PartOf, RootPolicy, StepToolsError};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn json_and_yaml_records_load() {
    let v1 = read_step_file(&fixture("bracket-v1.json")).unwrap();
    let v2 = read_step_file(&fixture("bracket-v2.yaml")).unwrap();

    assert_eq!(v1.parts.len(), 4);
    assert_eq!(v1.relations.len(), 4);
    assert_eq!(v2.parts.len(), 5);
    assert_eq!(v2.relations[4].id, "washer");
    assert_eq!(v2.relations[4].name, "NAUO5");
    assert!(v2.header.is_none());
}

#[test]
fn unsupported_extension_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bracket.stp");
    std::fs::write(&path, "ISO-10303-21;").unwrap();

    let err = read_step_file(&path).unwrap_err();
    assert!(matches!(
        err,
        StepToolsError::Load {
            source: LoadErrorKind::UnsupportedExtension(ref ext),
            ..
        } if ext == "stp"
    ));
}

#[test]
fn missing_file_reports_its_path() {
    let err = load_step_file(Path::new("does/not/exist.json"), true).unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.json"));
}

#[test]
fn file_stem_fills_missing_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gearbox.json");
    std::fs::write(&path, r#"{"parts": [{"step_id": 1, "name": "Gearbox"}]}"#).unwrap();

    let file = read_step_file(&path).unwrap();
    assert_eq!(file.file_name.as_deref(), Some("gearbox"));
}

#[test]
fn compute_diff_places_added_part() {
    let first = read_step_file(&fixture("bracket-v1.json")).unwrap();
    let second = read_step_file(&fixture("bracket-v2.yaml")).unwrap();
    let config = DiffConfig::from_app(
        fixture("bracket-v1.json"),
        fixture("bracket-v2.yaml"),
        &AppConfig::default(),
    );

    let result = compute_diff(&config, &first, &second).unwrap();
    let added: Vec<_> = result
        .rows_tagged(PartOf::Second)
        .map(|r| r.row.instance_path.as_str())
        .collect();
    assert_eq!(added, ["Bracket.Plate (plate).Washer (washer)"]);
    assert_eq!(result.summary.outcome, DiffOutcome::Merged);
}

#[test]
fn run_diff_writes_json_and_signals_change() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("diff.json");
    let app = AppConfig::builder()
        .output_format(ReportFormat::Json)
        .output_file(Some(out.clone()))
        .fail_on_change(true)
        .quiet(true)
        .build();
    let config = DiffConfig::from_app(
        fixture("bracket-v1.json"),
        fixture("bracket-v2.yaml"),
        &app,
    );

    let code = run_diff(config).unwrap();
    assert_eq!(code, exit_codes::CHANGES_DETECTED);

    let report = read_json(&out);
    assert_eq!(report["summary"]["outcome"], "merged");
    assert_eq!(report["rows"].as_array().unwrap().len(), 7);
}

#[test]
fn run_diff_same_file_succeeds_even_when_strict() {
    let dir = TempDir::new().unwrap();
    let app = AppConfig::builder()
        .output_format(ReportFormat::Summary)
        .output_file(Some(dir.path().join("summary.txt")))
        .fail_on_change(true)
        .fail_on_unresolved(true)
        .quiet(true)
        .build();
    let config = DiffConfig::from_app(
        fixture("bracket-v1.json"),
        fixture("bracket-v1.json"),
        &app,
    );

    assert_eq!(run_diff(config).unwrap(), exit_codes::SUCCESS);
}

#[test]
fn run_diff_flags_unresolved_before_changes() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.json");
    std::fs::write(
        &other,
        r#"{"parts": [{"step_id": 1, "name": "Frame"}, {"step_id": 2, "name": "Rail"}],
            "relations": [{"step_id": 5, "id": "r", "relating_id": 1, "related_id": 2}]}"#,
    )
    .unwrap();
    let app = AppConfig::builder()
        .root_policy(RootPolicy::LeaveUnresolved)
        .output_format(ReportFormat::Table)
        .output_file(Some(dir.path().join("table.txt")))
        .fail_on_change(true)
        .fail_on_unresolved(true)
        .quiet(true)
        .build();
    let config = DiffConfig::from_app(fixture("bracket-v1.json"), other, &app);

    assert_eq!(run_diff(config).unwrap(), exit_codes::UNRESOLVED_NODES);
}

#[test]
fn run_tree_filters_to_matching_branches() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("tree.json");
    let app = AppConfig::builder()
        .output_format(ReportFormat::Json)
        .output_file(Some(out.clone()))
        .quiet(true)
        .build();
    let config = TreeConfig {
        path: fixture("bracket-v1.json"),
        filter: Some("bolt-2".to_string()),
        output: app.output,
        behavior: app.behavior,
    };

    assert_eq!(run_tree(config).unwrap(), exit_codes::SUCCESS);

    let report = read_json(&out);
    let paths: Vec<_> = report["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["instance_path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        paths,
        [
            "Bracket",
            "Bracket.Bolt (bolt-2)",
            "Bracket.Bolt (bolt-2).Nut (nut)"
        ]
    );
}
