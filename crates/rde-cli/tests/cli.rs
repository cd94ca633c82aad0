//! Listings, report rendering and exit codes over the builtin files-schema.

use std::path::PathBuf;

use rde_cli::exit::{EXIT_INVALID, EXIT_OK, exit_code_for_report};
use rde_cli::summary::{
    describe_layout, kinds_plain, kinds_table, report_footer, report_table, rules_table,
};
use rde_model::ContextFrame;
use rde_schema::load_default_schema;
use rde_validate::{BatchPolicy, Validator, ValidatorOptions, rule_catalogue};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn plain_kinds_listing() {
    let schema = load_default_schema().unwrap();
    insta::assert_snapshot!(kinds_plain(&schema), @r"
    - f1: Big file
    - f2: The summary file
    ");
}

#[test]
fn kinds_table_describes_layouts() {
    let schema = load_default_schema().unwrap();
    let f1 = schema.get("f1").unwrap();
    let f2 = schema.get("f2").unwrap();
    assert_eq!(describe_layout(&f1.layout), "3 section(s) (last unbounded)");
    assert_eq!(describe_layout(&f2.layout), "flat, 4 line(s)");

    let rendered = kinds_table(&schema).to_string();
    assert!(rendered.contains("Big file"));
    assert!(rendered.contains("The summary file"));
}

#[test]
fn rules_table_lists_every_key() {
    let rendered = rules_table(&rule_catalogue()).to_string();
    for key in ["str", "_str", "istr", "regex", "int", "_float", "req", "_req"] {
        assert!(rendered.contains(key), "missing rule {key}");
    }
}

#[test]
fn fixtures_validate_against_builtin_schema() {
    let validator = Validator::new(
        load_default_schema().unwrap(),
        ValidatorOptions::default().with_policy(BatchPolicy::Continue),
    );
    let specs = [
        format!("f1:{}", fixture("sample_f1.csv")),
        format!("f2:{}", fixture("sample_f2.csv")),
        format!("f1:{}", fixture("bad_date_f1.csv")),
    ];
    let report = validator.validate_all(&specs);

    assert_eq!(report.passed_count(), 2);
    assert_eq!(report.failed_count(), 1);
    let summary = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(summary.lines, 11);
    assert_eq!(summary.sections, 3);

    let error = report.first_failure().unwrap();
    assert_eq!(error.row(), Some(3));
    assert_eq!(error.column(), Some(1));
    assert!(
        error
            .context()
            .contains(&ContextFrame::FileSpec(specs[2].clone()))
    );

    let rendered = report_table(&report).to_string();
    assert!(rendered.contains("FAILED"));
    assert_eq!(report_footer(&report), "2 passed, 1 failed");
}

#[test]
fn fail_fast_footer_counts_skipped_files() {
    let validator = Validator::new(load_default_schema().unwrap(), ValidatorOptions::default());
    let specs = [
        format!("f1:{}", fixture("bad_date_f1.csv")),
        format!("f2:{}", fixture("sample_f2.csv")),
    ];
    let report = validator.validate_all(&specs);
    assert_eq!(report_footer(&report), "0 passed, 1 failed, 1 skipped");
}

#[test]
fn exit_codes_follow_the_batch_outcome() {
    let validator = Validator::new(
        load_default_schema().unwrap(),
        ValidatorOptions::default().with_policy(BatchPolicy::Continue),
    );
    let passing = validator.validate_all([format!("f1:{}", fixture("sample_f1.csv"))]);
    assert_eq!(exit_code_for_report(&passing), EXIT_OK);

    let failures = [
        format!("f1:{}", fixture("bad_date_f1.csv")),
        format!("f1:{}", fixture("absent.csv")),
        format!("f9:{}", fixture("sample_f2.csv")),
    ];
    for spec in failures {
        let report = validator.validate_all([spec.as_str()]);
        assert_eq!(exit_code_for_report(&report), EXIT_INVALID, "{spec}");
    }
}
