//! Compiled, immutable schema types.

use std::collections::BTreeMap;

use crate::error::{SchemaError, SectionDefect};
use crate::rule::CellRule;

/// 1-based line number within an input file.
pub type LineNo = usize;

/// Rules for one line, keyed by 0-based column. Absent columns are unchecked.
pub type LineSchema = BTreeMap<usize, CellRule>;

/// Rules for many lines, keyed by absolute 1-based line number.
pub type LinesSchema = BTreeMap<LineNo, LineSchema>;

/// A contiguous range of content lines and the rules for its lines.
#[derive(Debug, Clone)]
pub struct SectionDescriptor {
    pub start: LineNo,
    /// Last content line (inclusive); `None` runs to the end of the file.
    pub end: Option<LineNo>,
    pub lines: LinesSchema,
}

impl SectionDescriptor {
    pub fn new(start: LineNo, end: Option<LineNo>) -> Self {
        Self {
            start,
            end,
            lines: LinesSchema::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LineNo, schema: LineSchema) -> Self {
        self.lines.insert(line, schema);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    pub fn contains(&self, line: LineNo) -> bool {
        line >= self.start && self.end.is_none_or(|end| line <= end)
    }

    /// Reject line schemas declared outside the section bounds.
    pub fn check_line_bounds(&self) -> Result<(), SectionDefect> {
        match self.lines.keys().find(|line| !self.contains(**line)) {
            Some(line) => Err(SectionDefect::LineOutOfBounds {
                line: *line,
                start: self.start,
                end: self.end,
            }),
            None => Ok(()),
        }
    }
}

/// Which path drives validation of a file-kind.
#[derive(Debug, Clone)]
pub enum Layout {
    /// Sections sorted by `start`, separated by blank break lines.
    Sectioned(Vec<SectionDescriptor>),
    /// A single implicit section spanning the whole stream.
    Flat(LinesSchema),
}

impl Layout {
    /// Build a sectioned layout, sorting descriptors by `start`.
    pub fn sectioned(mut sections: Vec<SectionDescriptor>) -> Self {
        sections.sort_by_key(|section| section.start);
        Self::Sectioned(sections)
    }
}

/// Schema for one named category of input files.
#[derive(Debug, Clone)]
pub struct FileKindSchema {
    pub id: String,
    pub description: String,
    pub layout: Layout,
    /// Per-kind override of the validator's delimiter.
    pub delimiter: Option<u8>,
}

impl FileKindSchema {
    pub fn new(id: impl Into<String>, description: impl Into<String>, layout: Layout) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            layout,
            delimiter: None,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

/// The registry of file-kinds, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FilesSchema {
    kinds: Vec<FileKindSchema>,
}

impl FilesSchema {
    /// Build a registry; duplicate ids are a schema error.
    pub fn new(kinds: Vec<FileKindSchema>) -> Result<Self, SchemaError> {
        for (idx, kind) in kinds.iter().enumerate() {
            if kinds[..idx].iter().any(|other| other.id == kind.id) {
                return Err(SchemaError::invalid(format!(
                    "duplicate file-kind `{}`",
                    kind.id
                )));
            }
        }
        Ok(Self { kinds })
    }

    pub fn kinds(&self) -> &[FileKindSchema] {
        &self.kinds
    }

    pub fn kind_ids(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|kind| kind.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&FileKindSchema> {
        self.kinds.iter().find(|kind| kind.id == id)
    }

    /// Look up a file-kind, listing the known ids when it is missing.
    pub fn resolve(&self, id: &str) -> Result<&FileKindSchema, SchemaError> {
        self.get(id).ok_or_else(|| SchemaError::UnknownFileKind {
            kind: id.to_string(),
            known: self.kind_ids().collect::<Vec<_>>().join(", "),
        })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
