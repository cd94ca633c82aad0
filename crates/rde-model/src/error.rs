//! Error taxonomy for schema compilation and file validation.
//!
//! Errors carry an ordered list of [`ContextFrame`]s. Each layer appends its
//! own position (column, row, section, file-spec) while the error unwinds, so
//! the rendered message reads as a breadcrumb trail from the failing cell out
//! to the file that contained it.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::LineNo;

/// Positional context appended to an error as it propagates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextFrame {
    /// 0-based column of the failing cell.
    Column(usize),
    /// 1-based line number in the input file.
    Row(LineNo),
    /// 0-based index of the section descriptor (after sorting by start).
    Section(usize),
    /// The file-spec as given by the caller.
    FileSpec(String),
}

impl fmt::Display for ContextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => write!(f, "column: {column}"),
            Self::Row(row) => write!(f, "row: {row}"),
            Self::Section(index) => write!(f, "section: {index}"),
            Self::FileSpec(spec) => write!(f, "file-spec: {spec:?}"),
        }
    }
}

/// What is wrong with a single section descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionDefect {
    /// A section follows one whose end is unbounded.
    AfterUnbounded { start: LineNo },
    /// The section starts at or before the previous section's end.
    Overlap { start: LineNo, last_end: LineNo },
    /// The declared end does not exceed the declared start.
    ZeroLength { start: LineNo, end: LineNo },
    /// A line schema is declared for a line outside the section bounds.
    LineOutOfBounds {
        line: LineNo,
        start: LineNo,
        end: Option<LineNo>,
    },
}

impl fmt::Display for SectionDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AfterUnbounded { start } => {
                write!(f, "extraneous section at line {start} after an unbounded section")
            }
            Self::Overlap { start, last_end } => write!(
                f,
                "section overlap: start {start} is not after previous end {last_end}"
            ),
            Self::ZeroLength { start, end } => {
                write!(f, "zero-length section: end {end} does not exceed start {start}")
            }
            Self::LineOutOfBounds { line, start, end } => match end {
                Some(end) => write!(f, "line {line} lies outside section {start}..={end}"),
                None => write!(f, "line {line} lies before section start {start}"),
            },
        }
    }
}

/// The schema itself is malformed. Never caused by input data.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown cell-rule `{key}`; must be one of: {expected}")]
    UnknownRule { key: String, expected: String },

    #[error("cell-rule `{key}` requires an argument")]
    MissingArgument { key: String },

    #[error("cell-rule `{key}` takes no argument, got {arg:?}")]
    UnexpectedArgument { key: String, arg: String },

    #[error("invalid regex {pattern:?} for cell-rule `{key}`: {source}")]
    InvalidRegex {
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unexpected cell-rules {found}; one of (string, mapping) expected")]
    InvalidRuleShape { found: String },

    #[error("schema-section no. {index}: {defect}")]
    Section { index: usize, defect: SectionDefect },

    #[error("sectioned schema declares no sections")]
    NoSections,

    #[error("unknown file-kind `{kind}`; must be one of: {known}")]
    UnknownFileKind { kind: String, known: String },

    #[error(
        "no file-kind deduced for file-spec {spec:?}; either specify it per-file as \
         <file-kind>:<path> or configure a default file-kind"
    )]
    NoFileKind { spec: String },

    #[error("failed to parse schema {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("failed to read schema {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid schema: {message}")]
    Invalid { message: String },
}

impl SchemaError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Why a cell failed its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NotEqual { expected: String },
    NotEqualCaseless { expected: String },
    NoMatch { pattern: String },
    NotInteger,
    NotFloat,
    Empty,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEqual { expected } => write!(f, "does not equal {expected:?}"),
            Self::NotEqualCaseless { expected } => {
                write!(f, "does not equal(caseless) {expected:?}")
            }
            Self::NoMatch { pattern } => write!(f, "does not match regex {pattern:?}"),
            Self::NotInteger => f.write_str("is not an integer"),
            Self::NotFloat => f.write_str("is not a float"),
            Self::Empty => f.write_str("must not be empty"),
        }
    }
}

/// A cell that failed one rule. Column and row are added by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cell:?} {reason}; rule: {key}({})", .arg.as_deref().unwrap_or_default())]
pub struct RuleFailure {
    /// Registry key of the failing rule, including any `_` prefix.
    pub key: String,
    pub arg: Option<String>,
    /// Raw text of the offending cell.
    pub cell: String,
    pub reason: FailureReason,
}

/// Section-boundary violations detected while splitting the input stream.
#[derive(Debug, Error)]
pub enum StreamBoundary {
    #[error("found non-void section-break at line {line}: {content:?}")]
    NonBlankBreak { line: LineNo, content: String },

    #[error("jumped outside a section at line {line}: next section starts at {expected_start}")]
    JumpedSection {
        line: LineNo,
        expected_start: LineNo,
    },

    #[error("walking outside a section at line {line}: section starts at {start}")]
    OutsideSection { line: LineNo, start: LineNo },

    #[error("line {line} lies beyond the last declared section (ending at {last_end})")]
    BeyondLastSection { line: LineNo, last_end: LineNo },

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The underlying cause of an [`RdeError`].
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Rule(#[from] RuleFailure),

    #[error(transparent)]
    Boundary(#[from] StreamBoundary),

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),

    #[error("failed to split cells: {message}")]
    Decode { message: String },
}

/// Error returned by every validation entry point.
///
/// `Display` renders the cause followed by one indented line per context
/// frame, innermost first.
#[derive(Debug)]
pub struct RdeError {
    kind: ErrorKind,
    context: Vec<ContextFrame>,
}

impl RdeError {
    pub fn new(kind: impl Into<ErrorKind>) -> Self {
        Self {
            kind: kind.into(),
            context: Vec::new(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode {
            message: message.into(),
        })
    }

    /// Append a context frame and return the error.
    #[must_use]
    pub fn with_context(mut self, frame: ContextFrame) -> Self {
        self.context.push(frame);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn context(&self) -> &[ContextFrame] {
        &self.context
    }

    /// True when the schema, not the data, is at fault.
    pub fn is_schema_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Schema(_))
    }

    /// True for rule failures and section-boundary violations.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::Rule(_) | ErrorKind::Boundary(_))
    }

    /// The rule failure, if this error came from a cell check.
    pub fn rule_failure(&self) -> Option<&RuleFailure> {
        match &self.kind {
            ErrorKind::Rule(failure) => Some(failure),
            _ => None,
        }
    }

    /// The boundary violation, if this error came from the stream splitter.
    pub fn boundary(&self) -> Option<&StreamBoundary> {
        match &self.kind {
            ErrorKind::Boundary(boundary) => Some(boundary),
            _ => None,
        }
    }

    /// The innermost row frame, if any.
    pub fn row(&self) -> Option<LineNo> {
        self.context.iter().find_map(|frame| match frame {
            ContextFrame::Row(row) => Some(*row),
            _ => None,
        })
    }

    /// The innermost column frame, if any.
    pub fn column(&self) -> Option<usize> {
        self.context.iter().find_map(|frame| match frame {
            ContextFrame::Column(column) => Some(*column),
            _ => None,
        })
    }
}

impl fmt::Display for RdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for frame in &self.context {
            write!(f, "\n  {frame}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RdeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for RdeError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<SchemaError> for RdeError {
    fn from(error: SchemaError) -> Self {
        Self::new(error)
    }
}

impl From<RuleFailure> for RdeError {
    fn from(error: RuleFailure) -> Self {
        Self::new(error)
    }
}

impl From<StreamBoundary> for RdeError {
    fn from(error: StreamBoundary) -> Self {
        Self::new(error)
    }
}

impl From<io::Error> for RdeError {
    fn from(error: io::Error) -> Self {
        Self::new(error)
    }
}

pub type Result<T> = std::result::Result<T, RdeError>;
