//! Lazy, single-pass line reading with raw line endings preserved.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::debug;

use crate::error::{IngestError, Result};
use crate::file_spec::InputSource;

/// Open an input source for buffered reading.
pub fn open_source(source: &InputSource) -> Result<Box<dyn BufRead>> {
    match source {
        InputSource::Stdin => {
            debug!("reading from stdin");
            Ok(Box::new(io::stdin().lock()))
        }
        InputSource::Path(path) => {
            let file = File::open(path).map_err(|source| IngestError::Open {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "opened input file");
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Iterator over `(line_no, raw_line)` with 1-based numbering.
///
/// Each item keeps its `\n` / `\r\n` terminator, if any. The stream is
/// consumed as lines are pulled; after an error the iterator is exhausted.
pub struct Lines<R> {
    reader: R,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                Some(Ok((self.line_no, line)))
            }
            Err(source) => {
                self.done = true;
                Some(Err(IngestError::Read {
                    line: self.line_no + 1,
                    source,
                }))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Lines<R> {}
