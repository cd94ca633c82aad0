//! Batch validation of file-specs on disk.

use std::fs;
use std::path::Path;

use rde_model::{ContextFrame, StreamBoundary};
use rde_schema::parse_schema;
use rde_validate::{BatchPolicy, OutcomeStatus, Validator, ValidatorOptions};

const SCHEMA: &str = r#"
file_kinds:
  f1:
    description: Header file
    lines:
      1: [HEADER, {int: }]
  f2:
    description: Summary
    lines:
      1: [{istr: summary}]
"#;

fn validator(options: ValidatorOptions) -> Validator {
    Validator::new(parse_schema(SCHEMA, "test").unwrap(), options)
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

#[test]
fn fail_fast_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.csv", "HEADER,3\n");
    let bad = write(dir.path(), "bad.csv", "HEADER,x\n");
    let specs = [
        format!("f1:{good}"),
        format!("f1:{bad}"),
        format!("f2:{good}"),
    ];
    let report = validator(ValidatorOptions::default()).validate_all(&specs);
    assert_eq!(report.policy, BatchPolicy::FailFast);
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.skipped, [specs[2].clone()]);
    assert!(!report.is_ok());

    let err = report.first_failure().unwrap();
    assert_eq!(
        err.context().last(),
        Some(&ContextFrame::FileSpec(specs[1].clone()))
    );
    let statuses: Vec<OutcomeStatus> = report.records().iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        [OutcomeStatus::Ok, OutcomeStatus::Failed, OutcomeStatus::Skipped]
    );
}

#[test]
fn continue_policy_validates_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(dir.path(), "bad.csv", "HEADER,x\n");
    let summary = write(dir.path(), "summary.csv", "SUMMARY\n");
    let specs = [format!("f1:{bad}"), format!("f2:{summary}")];
    let report = validator(ValidatorOptions::default().with_policy(BatchPolicy::Continue))
        .validate_all(&specs);
    assert!(report.skipped.is_empty());
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.failed_count(), 1);
    assert!(!report.has_unexpected_errors());
}

#[test]
fn default_kind_applies_to_bare_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "summary.csv", "Summary,extra\n");
    let report = validator(ValidatorOptions::default().with_default_kind(Some("f2".to_string())))
        .validate_all([path.as_str()]);
    assert!(report.is_ok());
}

#[test]
fn bare_path_without_default_kind_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "summary.csv", "Summary\n");
    let report = validator(ValidatorOptions::default()).validate_all([path.as_str()]);
    let err = report.first_failure().unwrap();
    assert!(err.is_schema_error());
    assert!(err.to_string().contains("no file-kind deduced"));
}

#[test]
fn missing_file_is_a_boundary_failure_with_spec() {
    let dir = tempfile::tempdir().unwrap();
    let spec = format!("f1:{}", dir.path().join("absent.csv").display());
    let report = validator(ValidatorOptions::default()).validate_all([spec.as_str()]);
    let err = report.first_failure().unwrap();
    assert!(matches!(err.boundary(), Some(StreamBoundary::Open { .. })));
    assert!(err.to_string().contains("file-spec:"));
}

#[test]
fn records_serialize_for_reporting() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.csv", "HEADER,3\nmore\n");
    let spec = format!("f1:{good}");
    let report = validator(ValidatorOptions::default()).validate_all([spec.as_str()]);
    let json = serde_json::to_value(report.records()).unwrap();
    assert_eq!(json[0]["status"], "ok");
    assert_eq!(json[0]["lines"], 2);
    assert!(json[0].get("error").is_none());
}
