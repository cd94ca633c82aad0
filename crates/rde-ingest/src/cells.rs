//! Split raw lines into cells with the `csv` crate.
//!
//! Lines are parsed one by one so the resulting rows stay aligned with the
//! original line numbers; `csv` would otherwise skip blank lines.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{IngestError, Result};

pub const DEFAULT_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Copy)]
pub struct CellSplitter {
    delimiter: u8,
}

impl Default for CellSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl CellSplitter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Split one raw line; a blank line yields no cells.
    pub fn split_line(&self, line_no: usize, line: &str) -> Result<Vec<String>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::None)
            .delimiter(self.delimiter)
            .from_reader(line.as_bytes());
        let mut record = StringRecord::new();
        let found = reader
            .read_record(&mut record)
            .map_err(|source| IngestError::Csv {
                line: line_no,
                source,
            })?;
        if !found {
            return Ok(Vec::new());
        }
        Ok(record.iter().map(str::to_string).collect())
    }

    /// Split a buffered section; `first_line` numbers the first row.
    pub fn split_lines<S: AsRef<str>>(
        &self,
        first_line: usize,
        lines: &[S],
    ) -> Result<Vec<Vec<String>>> {
        lines
            .iter()
            .enumerate()
            .map(|(offset, line)| self.split_line(first_line + offset, line.as_ref()))
            .collect()
    }
}
