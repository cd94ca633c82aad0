//! Section-aware stream validation and cell-rule evaluation.
//!
//! A [`Validator`] resolves a file-kind from its [`rde_model::FilesSchema`],
//! splits the input stream into the kind's sections, and checks every
//! declared cell. Validation is fail-fast per file: the first failure is
//! returned with its column, row, section and file-spec attached.

#![deny(unsafe_code)]

pub mod lines;
pub mod planner;
pub mod rules;
pub mod splitter;
pub mod validator;

pub use lines::{validate_row, validate_section};
pub use planner::{BreakLines, is_break_line, plan_sections};
pub use rules::{RuleInfo, evaluate_call, evaluate_rule, is_missing, rule_catalogue};
pub use splitter::{SectionChunk, SectionSplitter};
pub use validator::{
    BatchPolicy, BatchReport, FileOutcome, FileSummary, OutcomeRecord, OutcomeStatus, Validator,
    ValidatorOptions,
};
