#![deny(unsafe_code)]

pub mod cells;
pub mod error;
pub mod file_spec;
pub mod lines;

pub use cells::{CellSplitter, DEFAULT_DELIMITER};
pub use error::{IngestError, Result};
pub use file_spec::{FileSpec, InputSource, STDIN_PATH};
pub use lines::{Lines, open_source};
