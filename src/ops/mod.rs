//! High-level operations.

pub mod driver;

pub use driver::{report_validation_error, run, DriverError, RunOptions, EXIT_USAGE};
