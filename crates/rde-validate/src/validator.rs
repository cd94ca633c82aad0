//! File-kind validation: resolve a kind, open the input, and drive the
//! section splitter and line validator over it.

use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, info, info_span};

use rde_ingest::{CellSplitter, DEFAULT_DELIMITER, FileSpec, IngestError, Lines, open_source};
use rde_model::{
    ContextFrame, FileKindSchema, FilesSchema, Layout, LineNo, LinesSchema, RdeError, SchemaError,
    SectionDescriptor, StreamBoundary,
};

use crate::lines::{validate_row, validate_section};
use crate::splitter::SectionSplitter;

/// What to do with the remaining files once one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Stop at the first failing file.
    #[default]
    FailFast,
    /// Validate every file and report all outcomes.
    Continue,
}

#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Delimiter used unless a file-kind overrides it.
    pub delimiter: u8,
    /// File-kind for file-specs that do not name one.
    pub default_kind: Option<String>,
    pub policy: BatchPolicy,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            default_kind: None,
            policy: BatchPolicy::default(),
        }
    }
}

impl ValidatorOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_default_kind(mut self, kind: Option<String>) -> Self {
        self.default_kind = kind;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Counts for a file that passed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub lines: LineNo,
    pub sections: usize,
}

/// Validates input streams against a loaded [`FilesSchema`].
#[derive(Debug, Clone)]
pub struct Validator {
    schema: FilesSchema,
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(schema: FilesSchema, options: ValidatorOptions) -> Self {
        Self { schema, options }
    }

    /// The file-kind named by the file-spec, else the configured default.
    pub fn resolve_kind(&self, spec: &FileSpec) -> Result<&FileKindSchema, SchemaError> {
        let kind = spec
            .kind()
            .or(self.options.default_kind.as_deref())
            .ok_or_else(|| SchemaError::NoFileKind {
                spec: spec.to_string(),
            })?;
        self.schema.resolve(kind)
    }

    /// Validate a stream as the file-kind `kind_id`.
    pub fn validate_stream<R: BufRead>(
        &self,
        kind_id: &str,
        reader: R,
    ) -> Result<FileSummary, RdeError> {
        let kind = self.schema.resolve(kind_id)?;
        self.validate_kind_stream(kind, reader)
    }

    /// Validate a stream against an already resolved file-kind.
    pub fn validate_kind_stream<R: BufRead>(
        &self,
        kind: &FileKindSchema,
        reader: R,
    ) -> Result<FileSummary, RdeError> {
        let delimiter = kind.delimiter.unwrap_or(self.options.delimiter);
        let lines = Lines::new(reader).map(|item| item.map_err(ingest_error));
        match &kind.layout {
            Layout::Sectioned(sections) => validate_sectioned(sections, delimiter, lines),
            Layout::Flat(schema) => validate_flat(schema, delimiter, lines),
        }
    }

    /// Resolve, open and validate one file-spec.
    ///
    /// Any error is annotated with the file-spec.
    pub fn validate_file_spec(&self, spec: &FileSpec) -> Result<FileSummary, RdeError> {
        let span = info_span!("file", spec = %spec);
        let _guard = span.enter();
        let result = self.validate_spec_inner(spec);
        match &result {
            Ok(summary) => info!(
                lines = summary.lines,
                sections = summary.sections,
                "{spec}: OK"
            ),
            Err(err) => debug!(error = %err, "{spec}: FAILED"),
        }
        result.map_err(|err| err.with_context(ContextFrame::FileSpec(spec.to_string())))
    }

    fn validate_spec_inner(&self, spec: &FileSpec) -> Result<FileSummary, RdeError> {
        let kind = self.resolve_kind(spec)?;
        debug!(kind = %kind.id, source = %spec.source(), "validating");
        let reader = open_source(spec.source()).map_err(ingest_error)?;
        self.validate_kind_stream(kind, reader)
    }

    /// Validate every file-spec in order, honouring the batch policy.
    pub fn validate_all<I, S>(&self, specs: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport {
            policy: self.options.policy,
            outcomes: Vec::new(),
            skipped: Vec::new(),
        };
        let mut halted = false;
        for raw in specs {
            let raw = raw.as_ref();
            if halted {
                report.skipped.push(raw.to_string());
                continue;
            }
            let spec = FileSpec::parse(raw);
            let result = self.validate_file_spec(&spec);
            if result.is_err() && self.options.policy == BatchPolicy::FailFast {
                halted = true;
            }
            report.outcomes.push(FileOutcome {
                spec: raw.to_string(),
                result,
            });
        }
        report
    }
}

fn validate_sectioned<I>(
    sections: &[SectionDescriptor],
    delimiter: u8,
    lines: I,
) -> Result<FileSummary, RdeError>
where
    I: Iterator<Item = Result<(LineNo, String), RdeError>>,
{
    let cells = CellSplitter::new(delimiter);
    let mut splitter = SectionSplitter::new(sections, delimiter, lines)?;
    let mut summary = FileSummary::default();
    for chunk in splitter.by_ref() {
        let chunk = chunk?;
        debug!(
            section = chunk.index,
            first_line = chunk.first_line,
            last_line = chunk.last_line(),
            "validating section"
        );
        let section_frame = ContextFrame::Section(chunk.index);
        let rows = cells
            .split_lines(chunk.first_line, &chunk.lines)
            .map_err(|err| ingest_error(err).with_context(section_frame.clone()))?;
        validate_section(&chunk.section.lines, &rows, chunk.first_line)
            .map_err(|err| err.with_context(section_frame))?;
        summary.sections += 1;
    }
    summary.lines = splitter.lines_seen();
    Ok(summary)
}

/// A flat file is one implicit section starting at line 1, validated as it
/// streams by.
fn validate_flat<I>(schema: &LinesSchema, delimiter: u8, lines: I) -> Result<FileSummary, RdeError>
where
    I: Iterator<Item = Result<(LineNo, String), RdeError>>,
{
    let cells = CellSplitter::new(delimiter);
    let mut summary = FileSummary::default();
    for item in lines {
        let (line_no, line) = item?;
        summary.lines = line_no;
        let Some(line_schema) = schema.get(&line_no) else {
            continue;
        };
        let row = cells.split_line(line_no, &line).map_err(ingest_error)?;
        validate_row(line_schema, &row).map_err(|err| err.with_context(ContextFrame::Row(line_no)))?;
    }
    if summary.lines > 0 {
        summary.sections = 1;
    }
    Ok(summary)
}

fn ingest_error(err: IngestError) -> RdeError {
    match err {
        IngestError::Open { path, source } => StreamBoundary::Open { path, source }.into(),
        IngestError::Read { line, source } => {
            RdeError::from(source).with_context(ContextFrame::Row(line))
        }
        IngestError::Csv { line, source } => {
            RdeError::decode(source.to_string()).with_context(ContextFrame::Row(line))
        }
    }
}

/// The result of validating one file-spec.
#[derive(Debug)]
pub struct FileOutcome {
    pub spec: String,
    pub result: Result<FileSummary, RdeError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch, in the order the file-specs were given.
#[derive(Debug)]
pub struct BatchReport {
    pub policy: BatchPolicy,
    pub outcomes: Vec<FileOutcome>,
    /// File-specs not attempted because an earlier file failed.
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_ok)
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_ok()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &RdeError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((outcome.spec.as_str(), err)),
        })
    }

    pub fn first_failure(&self) -> Option<&RdeError> {
        self.failures().next().map(|(_, err)| err)
    }

    /// True when any failure was not a schema or validation failure.
    pub fn has_unexpected_errors(&self) -> bool {
        self.failures()
            .any(|(_, err)| !(err.is_schema_error() || err.is_validation_failure()))
    }

    /// Serializable view of the batch, one record per file-spec.
    pub fn records(&self) -> Vec<OutcomeRecord> {
        let mut records: Vec<OutcomeRecord> = self
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(summary) => OutcomeRecord {
                    spec: outcome.spec.clone(),
                    status: OutcomeStatus::Ok,
                    lines: Some(summary.lines),
                    sections: Some(summary.sections),
                    error: None,
                },
                Err(err) => OutcomeRecord {
                    spec: outcome.spec.clone(),
                    status: OutcomeStatus::Failed,
                    lines: None,
                    sections: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();
        records.extend(self.skipped.iter().map(|spec| OutcomeRecord {
            spec: spec.clone(),
            status: OutcomeStatus::Skipped,
            lines: None,
            sections: None,
            error: None,
        }));
        records
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub spec: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<LineNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
