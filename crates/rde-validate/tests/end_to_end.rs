//! End-to-end validation of in-memory streams against YAML schemas.

use std::io::Cursor;

use rde_model::{ContextFrame, ErrorKind, FailureReason, StreamBoundary};
use rde_schema::parse_schema;
use rde_validate::{Validator, ValidatorOptions};

const TWO_SECTIONS: &str = r#"
file_kinds:
  two:
    description: Two sections around a mandatory break
    sections:
      - start: 1
        end: 2
        lines:
          1: {0: {str: HEADER}}
      - start: 4
        end: 5
        lines:
          4: {0: {_int: }}
          5: {0: {_int: }}
"#;

fn validator(schema: &str) -> Validator {
    Validator::new(
        parse_schema(schema, "test").expect("schema compiles"),
        ValidatorOptions::default(),
    )
}

#[test]
fn two_section_file_passes() {
    let summary = validator(TWO_SECTIONS)
        .validate_stream("two", Cursor::new("HEADER,\nfoo,\n\n12,\n,\n"))
        .expect("valid file");
    assert_eq!(summary.lines, 5);
    assert_eq!(summary.sections, 2);
}

#[test]
fn non_blank_break_fails_at_line_three() {
    let err = validator(TWO_SECTIONS)
        .validate_stream("two", Cursor::new("HEADER,\nfoo,\nX\n12,\n,\n"))
        .unwrap_err();
    assert!(err.is_validation_failure());
    assert!(matches!(
        err.boundary(),
        Some(StreamBoundary::NonBlankBreak { line: 3, .. })
    ));
    assert_eq!(err.row(), Some(3));
}

#[test]
fn cell_failure_reports_position_breadcrumbs() {
    let err = validator(TWO_SECTIONS)
        .validate_stream("two", Cursor::new("HEADER,\nfoo,\n\nNA,\n,\n"))
        .unwrap_err();
    let failure = err.rule_failure().expect("rule failure");
    assert_eq!(failure.key, "_int");
    assert_eq!(failure.cell, "NA");
    assert_eq!(failure.reason, FailureReason::NotInteger);
    assert_eq!(
        err.context(),
        [
            ContextFrame::Column(0),
            ContextFrame::Row(4),
            ContextFrame::Section(1)
        ]
    );
}

#[test]
fn header_mismatch_fails_in_first_section() {
    let err = validator(TWO_SECTIONS)
        .validate_stream("two", Cursor::new("HEADR,\nfoo,\n\n12,\n"))
        .unwrap_err();
    assert_eq!(err.rule_failure().unwrap().cell, "HEADR");
    assert_eq!(err.row(), Some(1));
}

#[test]
fn delimiter_only_break_is_accepted() {
    assert!(
        validator(TWO_SECTIONS)
            .validate_stream("two", Cursor::new("HEADER,\nfoo,\n,,\r\n12,\n"))
            .is_ok()
    );
}

#[test]
fn content_past_last_section_is_rejected() {
    let err = validator(TWO_SECTIONS)
        .validate_stream("two", Cursor::new("HEADER,\nfoo,\n\n12,\n,\n7,\n"))
        .unwrap_err();
    assert!(matches!(
        err.boundary(),
        Some(StreamBoundary::BeyondLastSection { line: 6, .. })
    ));
}

#[test]
fn unknown_kind_lists_valid_kinds() {
    let err = validator(TWO_SECTIONS)
        .validate_stream("nope", Cursor::new(""))
        .unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.to_string().contains("must be one of: two"));
}

#[test]
fn invalid_sections_fail_before_reading() {
    let schema = r#"
file_kinds:
  bad:
    sections:
      - {start: 1, end: 3}
      - {start: 3, end: 6}
"#;
    let err = validator(schema)
        .validate_stream("bad", Cursor::new("a\n"))
        .unwrap_err();
    match err.kind() {
        ErrorKind::Schema(schema_err) => {
            assert!(schema_err.to_string().starts_with("schema-section no. 1:"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn flat_file_validates_declared_lines_only() {
    let schema = r#"
file_kinds:
  flat:
    description: flat file
    lines:
      1: [fixed string, {_istr: FOO}, {_int: }, {req: }, {_req: }]
"#;
    let validator = validator(schema);
    for ok in [
        "fixed string,,,anything,\n",
        "fixed string,,12,x,z\n",
        "\"fixed string\",\"FOO\",\"00\",\"x\",\"\"\n",
        "fixed string,foo,00,req,\nanything at all\n",
    ] {
        assert!(
            validator.validate_stream("flat", Cursor::new(ok)).is_ok(),
            "{ok:?} should pass"
        );
    }
    for bad in [
        "other string,,x,z\n",
        "fixed string ,,x,z\n",
        "fixed string,,-,x\n",
        "fixed string,bar,00,x\n",
        "\"fixed string\",\"FOO\",00,\"\",\"z\"\n",
    ] {
        assert!(
            validator.validate_stream("flat", Cursor::new(bad)).is_err(),
            "{bad:?} should fail"
        );
    }
}

#[test]
fn plain_string_rule_equals_str_rule() {
    let sugar = "file_kinds:\n  k:\n    lines:\n      1: [fixed string]\n";
    let explicit = "file_kinds:\n  k:\n    lines:\n      1: [{str: fixed string}]\n";
    for input in ["fixed string\n", "fixed string \n", "\n", "FIXED STRING\n"] {
        let a = validator(sugar).validate_stream("k", Cursor::new(input)).is_ok();
        let b = validator(explicit).validate_stream("k", Cursor::new(input)).is_ok();
        assert_eq!(a, b, "{input:?}");
    }
}

#[test]
fn per_kind_delimiter_overrides_default() {
    let schema = r#"
file_kinds:
  semi:
    delimiter: ";"
    sections:
      - start: 1
        end: 2
        lines:
          2: [{int: }, {float: }]
      - start: 4
        lines:
          4: [END]
"#;
    let validator = validator(schema);
    assert!(
        validator
            .validate_stream("semi", Cursor::new("x;y\n1;2.5\n;;\nEND;\n"))
            .is_ok()
    );
    let err = validator
        .validate_stream("semi", Cursor::new("x;y\n1;2.5\n,\nEND;\n"))
        .unwrap_err();
    assert!(matches!(
        err.boundary(),
        Some(StreamBoundary::NonBlankBreak { line: 3, .. })
    ));
}

#[test]
fn builtin_sample_passes() {
    let validator = Validator::new(
        rde_schema::load_default_schema().unwrap(),
        ValidatorOptions::default(),
    );
    let sample = "\
RDE Data Exchange File,1.0
Vehicle,WVW-0001
Test date,2017-06-21
Operator,

Time,Vehicle speed,NOx,CO2
s,km/h,mg/s,g/s

0.0,0.0,,
0.1,1.2,0.4,1.9
";
    let summary = validator.validate_stream("f1", Cursor::new(sample)).unwrap();
    assert_eq!(summary.sections, 3);
    assert_eq!(summary.lines, 10);
}
