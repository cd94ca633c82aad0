//! Split a line stream into schema-declared sections.
//!
//! The splitter pulls one line at a time. Lines at break indices must be
//! blank; every other line is appended to the current section's buffer until
//! the cursor passes the section's end, at which point the buffered section
//! is yielded and the next descriptor takes over. The sequence is single
//! pass and stops for good after the first error.

use std::mem;

use tracing::trace;

use rde_model::{ContextFrame, LineNo, RdeError, SchemaError, SectionDescriptor, StreamBoundary};

use crate::planner::{BreakLines, is_break_line, plan_sections};

/// The raw lines of one section, in file order.
#[derive(Debug)]
pub struct SectionChunk<'s> {
    /// 0-based index of the descriptor.
    pub index: usize,
    pub section: &'s SectionDescriptor,
    /// Line number of `lines[0]`.
    pub first_line: LineNo,
    pub lines: Vec<String>,
}

impl SectionChunk<'_> {
    pub fn last_line(&self) -> LineNo {
        self.first_line + self.lines.len().saturating_sub(1)
    }
}

pub struct SectionSplitter<'s, I> {
    sections: &'s [SectionDescriptor],
    breaks: BreakLines,
    delimiter: u8,
    lines: I,
    current: usize,
    buffer: Vec<String>,
    first_line: LineNo,
    lines_seen: LineNo,
    done: bool,
}

impl<'s, I> SectionSplitter<'s, I>
where
    I: Iterator<Item = Result<(LineNo, String), RdeError>>,
{
    /// Plan the sections and wrap the line stream.
    ///
    /// `sections` must be sorted by `start`.
    pub fn new(
        sections: &'s [SectionDescriptor],
        delimiter: u8,
        lines: I,
    ) -> Result<Self, SchemaError> {
        let breaks = plan_sections(sections)?;
        Ok(Self {
            sections,
            breaks,
            delimiter,
            lines,
            current: 0,
            buffer: Vec::new(),
            first_line: 0,
            lines_seen: 0,
            done: false,
        })
    }

    /// Number of input lines consumed so far.
    pub fn lines_seen(&self) -> LineNo {
        self.lines_seen
    }

    fn take_chunk(&mut self) -> Option<SectionChunk<'s>> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(SectionChunk {
            index: self.current,
            section: &self.sections[self.current],
            first_line: self.first_line,
            lines: mem::take(&mut self.buffer),
        })
    }

    /// Classify one line, returning a completed section when it was left.
    fn step(&mut self, line_no: LineNo, line: String) -> Result<Option<SectionChunk<'s>>, RdeError> {
        if self.breaks.contains(line_no) {
            if !is_break_line(&line, self.delimiter) {
                return Err(StreamBoundary::NonBlankBreak {
                    line: line_no,
                    content: line.trim_end_matches(['\r', '\n']).to_string(),
                }
                .into());
            }
            trace!(line = line_no, "section break");
            return Ok(None);
        }

        // With a planned break set every gap line is handled above, so the
        // jump and outside guards below only fire if the two disagree.
        let sections = self.sections;
        let section = &sections[self.current];
        let mut completed = None;
        match section.end {
            Some(end) if line_no > end => {
                let next_index = self.current + 1;
                let Some(next) = sections.get(next_index) else {
                    return Err(StreamBoundary::BeyondLastSection {
                        line: line_no,
                        last_end: end,
                    }
                    .into());
                };
                if line_no != next.start {
                    return Err(StreamBoundary::JumpedSection {
                        line: line_no,
                        expected_start: next.start,
                    }
                    .into());
                }
                completed = self.take_chunk();
                self.current = next_index;
            }
            _ if line_no < section.start => {
                return Err(StreamBoundary::OutsideSection {
                    line: line_no,
                    start: section.start,
                }
                .into());
            }
            _ => {}
        }

        if self.buffer.is_empty() {
            self.first_line = line_no;
        }
        self.buffer.push(line);
        Ok(completed)
    }
}

impl<'s, I> Iterator for SectionSplitter<'s, I>
where
    I: Iterator<Item = Result<(LineNo, String), RdeError>>,
{
    type Item = Result<SectionChunk<'s>, RdeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some(item) = self.lines.next() else {
                self.done = true;
                return self.take_chunk().map(Ok);
            };
            let step = item.and_then(|(line_no, line)| {
                self.lines_seen = line_no;
                self.step(line_no, line)
                    .map_err(|err| err.with_context(ContextFrame::Row(line_no)))
            });
            match step {
                Ok(Some(chunk)) => return Some(Ok(chunk)),
                Ok(None) => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.with_context(ContextFrame::Section(self.current))));
                }
            }
        }
        None
    }
}

impl<'s, I> std::iter::FusedIterator for SectionSplitter<'s, I> where
    I: Iterator<Item = Result<(LineNo, String), RdeError>>
{
}
