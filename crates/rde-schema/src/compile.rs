//! Compile raw YAML values into `rde-model` schema types.

use std::collections::BTreeMap;

use serde_yaml::Value;
use tracing::debug;

use rde_model::{
    CellRule, FileKindSchema, FilesSchema, Layout, LineSchema, LinesSchema, RuleCall,
    SchemaError, SectionDescriptor,
};

use crate::raw::{RawFileKind, RawFilesSchema, RawLineSchema, RawSection};

pub(crate) fn compile_files_schema(raw: RawFilesSchema) -> Result<FilesSchema, SchemaError> {
    let mut kinds = Vec::with_capacity(raw.file_kinds.len());
    for (id, kind) in raw.file_kinds {
        let compiled = compile_file_kind(&id, kind).map_err(|err| match err {
            SchemaError::Invalid { message } => {
                SchemaError::invalid(format!("file-kind `{id}`: {message}"))
            }
            other => other,
        })?;
        debug!(kind = %id, "compiled file-kind");
        kinds.push(compiled);
    }
    FilesSchema::new(kinds)
}

fn compile_file_kind(id: &str, raw: RawFileKind) -> Result<FileKindSchema, SchemaError> {
    let layout = match (raw.sections, raw.lines) {
        (Some(sections), _) => {
            let sections = sections
                .into_iter()
                .map(compile_section)
                .collect::<Result<Vec<_>, _>>()?;
            Layout::sectioned(sections)
        }
        (None, Some(lines)) => Layout::Flat(compile_lines(lines)?),
        (None, None) => Layout::Flat(LinesSchema::new()),
    };
    let mut schema = FileKindSchema::new(id, raw.description.unwrap_or_default(), layout);
    if let Some(delimiter) = raw.delimiter {
        schema = schema.with_delimiter(parse_delimiter(&delimiter)?);
    }
    Ok(schema)
}

fn compile_section(raw: RawSection) -> Result<SectionDescriptor, SchemaError> {
    let mut section = SectionDescriptor::new(raw.start, raw.end);
    if let Some(lines) = raw.lines {
        section.lines = compile_lines(lines)?;
    }
    Ok(section)
}

fn compile_lines(raw: BTreeMap<usize, RawLineSchema>) -> Result<LinesSchema, SchemaError> {
    let mut lines = LinesSchema::new();
    for (line, schema) in raw {
        if line == 0 {
            return Err(SchemaError::invalid("line numbers are 1-based, got 0"));
        }
        lines.insert(line, compile_line(schema)?);
    }
    Ok(lines)
}

fn compile_line(raw: RawLineSchema) -> Result<LineSchema, SchemaError> {
    let cells: Vec<(usize, Value)> = match raw {
        RawLineSchema::Columns(values) => values.into_iter().enumerate().collect(),
        RawLineSchema::Indexed(values) => values.into_iter().collect(),
    };
    let mut schema = LineSchema::new();
    for (column, value) in cells {
        if let Some(rule) = compile_cell_rule(value)? {
            schema.insert(column, rule);
        }
    }
    Ok(schema)
}

/// Compile one cell rule; `null` leaves the cell unchecked.
pub fn compile_cell_rule(value: Value) -> Result<Option<CellRule>, SchemaError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(CellRule::equals(text))),
        Value::Mapping(mapping) => {
            let mut calls = Vec::with_capacity(mapping.len());
            for (key, arg) in mapping {
                let Value::String(key) = key else {
                    return Err(SchemaError::InvalidRuleShape {
                        found: format!("rule-key {}", describe(&key)),
                    });
                };
                calls.push(RuleCall::compile(&key, scalar_arg(arg)?)?);
            }
            CellRule::new(calls).map(Some)
        }
        Value::Tagged(tagged) => compile_cell_rule(tagged.value),
        other => Err(SchemaError::InvalidRuleShape {
            found: describe(&other),
        }),
    }
}

fn scalar_arg(value: Value) -> Result<Option<String>, SchemaError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(SchemaError::InvalidRuleShape {
            found: format!("argument {}", describe(&other)),
        }),
    }
}

fn parse_delimiter(raw: &str) -> Result<u8, SchemaError> {
    match raw.as_bytes() {
        [byte] if byte.is_ascii() && !matches!(byte, b'\r' | b'\n' | b'"') => Ok(*byte),
        _ => Err(SchemaError::invalid(format!(
            "delimiter must be a single ASCII character, got {raw:?}"
        ))),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => format!("bool {flag}"),
        Value::Number(number) => format!("number {number}"),
        Value::String(text) => format!("string {text:?}"),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged {}", tagged.tag),
    }
}
