//! Section planning: validate section descriptors and derive break lines.

use std::collections::BTreeSet;

use rde_model::{LineNo, SchemaError, SectionDefect, SectionDescriptor};

/// The 1-based line indices that must be blank section breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakLines {
    indices: BTreeSet<LineNo>,
}

impl BreakLines {
    pub fn contains(&self, line: LineNo) -> bool {
        self.indices.contains(&line)
    }

    /// Ascending break indices.
    pub fn iter(&self) -> impl Iterator<Item = LineNo> + '_ {
        self.indices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Validate `start`-sorted descriptors and collect every line strictly
/// between consecutive sections (and before the first one).
///
/// Errors are tagged with the 0-based index of the offending descriptor.
pub fn plan_sections(sections: &[SectionDescriptor]) -> Result<BreakLines, SchemaError> {
    if sections.is_empty() {
        return Err(SchemaError::NoSections);
    }
    let mut indices = BTreeSet::new();
    // `None` once an unbounded section has been seen.
    let mut last_end: Option<LineNo> = Some(0);
    for (index, section) in sections.iter().enumerate() {
        let defect = |defect| SchemaError::Section { index, defect };
        let start = section.start;
        let Some(prev_end) = last_end else {
            return Err(defect(SectionDefect::AfterUnbounded { start }));
        };
        if start <= prev_end {
            return Err(defect(SectionDefect::Overlap {
                start,
                last_end: prev_end,
            }));
        }
        if let Some(end) = section.end
            && end <= start
        {
            return Err(defect(SectionDefect::ZeroLength { start, end }));
        }
        section.check_line_bounds().map_err(defect)?;
        indices.extend(prev_end + 1..start);
        last_end = section.end;
    }
    Ok(BreakLines { indices })
}

/// A break line holds nothing but delimiters and line-ending characters.
pub fn is_break_line(line: &str, delimiter: u8) -> bool {
    let delimiter = char::from(delimiter);
    line.chars()
        .all(|ch| ch == '\r' || ch == '\n' || ch == delimiter)
}
