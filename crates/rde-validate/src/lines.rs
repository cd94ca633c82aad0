//! Apply per-line cell rules to split rows.

use tracing::trace;

use rde_model::{ContextFrame, LineNo, LineSchema, LinesSchema, RdeError};

use crate::rules::evaluate_rule;

/// Validate the rows of one section.
///
/// `rows[0]` is line `section_start`. Schemas are sparse: undeclared lines
/// and columns are not checked, and neither are declared lines the input did
/// not reach. Stops at the first failing cell.
pub fn validate_section<S: AsRef<str>>(
    lines: &LinesSchema,
    rows: &[Vec<S>],
    section_start: LineNo,
) -> Result<(), RdeError> {
    for (&row_no, line_schema) in lines {
        let Some(cells) = row_no
            .checked_sub(section_start)
            .and_then(|offset| rows.get(offset))
        else {
            continue;
        };
        validate_row(line_schema, cells)
            .map_err(|err| err.with_context(ContextFrame::Row(row_no)))?;
    }
    Ok(())
}

/// Validate one row; columns past the end of the row are not checked.
pub fn validate_row<S: AsRef<str>>(schema: &LineSchema, cells: &[S]) -> Result<(), RdeError> {
    for (&column, rule) in schema {
        let Some(cell) = cells.get(column) else {
            trace!(column, "column beyond row, unchecked");
            continue;
        };
        evaluate_rule(rule, cell.as_ref())
            .map_err(|failure| RdeError::from(failure).with_context(ContextFrame::Column(column)))?;
    }
    Ok(())
}
