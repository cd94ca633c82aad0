//! Schema and error model for sectioned CSV validation.

#![deny(unsafe_code)]

pub mod error;
pub mod rule;
pub mod schema;

pub use error::{
    ContextFrame, ErrorKind, FailureReason, RdeError, Result, RuleFailure, SchemaError,
    SectionDefect, StreamBoundary,
};
pub use rule::{CellRule, CellValue, Check, OPTIONAL_PREFIX, RuleCall, RuleKind};
pub use schema::{
    FileKindSchema, FilesSchema, Layout, LineNo, LineSchema, LinesSchema, SectionDescriptor,
};
