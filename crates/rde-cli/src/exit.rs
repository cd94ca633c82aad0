//! Process exit codes for rdecheck.

use anyhow::{Result, bail};

use rde_model::SchemaError;
use rde_validate::BatchReport;

pub const EXIT_OK: i32 = 0;
/// A schema was rejected or a file failed validation.
pub const EXIT_INVALID: i32 = 1;
/// I/O, decoding or usage problems.
pub const EXIT_INTERNAL: i32 = 2;

/// Input archiving is accepted on the command line but not implemented.
pub fn refuse_archive(archive: bool) -> Result<()> {
    if archive {
        bail!("archiving input files is not implemented");
    }
    Ok(())
}

pub fn exit_code_for_report(report: &BatchReport) -> i32 {
    if report.is_ok() {
        EXIT_OK
    } else if report.has_unexpected_errors() {
        EXIT_INTERNAL
    } else {
        EXIT_INVALID
    }
}

pub fn exit_code_for_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<SchemaError>().is_some() {
        EXIT_INVALID
    } else {
        EXIT_INTERNAL
    }
}
