//! Serde mirror of the files-schema YAML, before compilation.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct RawFilesSchema {
    pub file_kinds: IndexMap<String, RawFileKind>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFileKind {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Option<Vec<RawSection>>,
    #[serde(default)]
    pub lines: Option<BTreeMap<usize, RawLineSchema>>,
    #[serde(default)]
    pub delimiter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSection {
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
    #[serde(default)]
    pub lines: Option<BTreeMap<usize, RawLineSchema>>,
}

/// A line's cell rules, either positional or keyed by column index.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawLineSchema {
    Columns(Vec<Value>),
    Indexed(BTreeMap<usize, Value>),
}
