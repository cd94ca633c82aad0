//! Library surface of the rdecheck binary: logging setup, exit codes and
//! output rendering.

pub mod exit;
pub mod logging;
pub mod summary;
