use std::io::Write;

use rde_model::{Layout, SchemaError};
use rde_schema::{load_default_schema, load_schema, parse_schema};

#[test]
fn builtin_schema_lists_kinds_in_declaration_order() {
    let schema = load_default_schema().expect("builtin schema compiles");
    let kinds: Vec<(&str, &str)> = schema
        .kinds()
        .iter()
        .map(|kind| (kind.id.as_str(), kind.description.as_str()))
        .collect();
    assert_eq!(kinds, [("f1", "Big file"), ("f2", "The summary file")]);
}

#[test]
fn builtin_big_file_is_sectioned() {
    let schema = load_default_schema().unwrap();
    let Layout::Sectioned(sections) = &schema.resolve("f1").unwrap().layout else {
        panic!("f1 must be sectioned");
    };
    let bounds: Vec<(usize, Option<usize>)> = sections.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(bounds, [(1, Some(4)), (6, Some(7)), (9, None)]);
    assert_eq!(sections[0].lines[&1].len(), 2);
}

#[test]
fn sections_are_sorted_and_delimiter_parsed() {
    let schema = parse_schema(
        r#"
file_kinds:
  semi:
    description: semicolon file
    delimiter: ";"
    sections:
      - start: 4
        end: 5
        lines:
          4: {0: {_int: }}
      - start: 1
        end: 2
        lines:
          1: [HEADER]
"#,
        "inline",
    )
    .unwrap();
    let kind = schema.resolve("semi").unwrap();
    assert_eq!(kind.delimiter, Some(b';'));
    let Layout::Sectioned(sections) = &kind.layout else {
        panic!("expected sections");
    };
    assert_eq!(sections[0].start, 1);
    assert_eq!(sections[1].start, 4);
}

#[test]
fn unknown_rule_key_fails_at_load() {
    let err = parse_schema(
        "file_kinds:\n  x:\n    lines:\n      1: [{bogus: x}]\n",
        "inline",
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownRule { ref key, .. } if key == "bogus"));
}

#[test]
fn malformed_yaml_names_its_origin() {
    let err = parse_schema("file_kinds: [", "broken.yaml").unwrap_err();
    match err {
        SchemaError::Parse { origin, .. } => assert_eq!(origin, "broken.yaml"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn zero_line_number_is_rejected() {
    let err = parse_schema("file_kinds:\n  x:\n    lines:\n      0: [a]\n", "inline").unwrap_err();
    assert!(err.to_string().contains("file-kind `x`"));
}

#[test]
fn schema_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "file_kinds:\n  only:\n    description: Only kind\n    lines:\n      1: [a, b]"
    )
    .unwrap();
    let schema = load_schema(file.path()).unwrap();
    assert_eq!(schema.len(), 1);
    assert!(matches!(
        schema.resolve("only").unwrap().layout,
        Layout::Flat(ref lines) if lines[&1].len() == 2
    ));
}

#[test]
fn missing_schema_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_schema(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, SchemaError::Read { .. }));
}
