//! imgbuild - a front end for building a runnable image with make
//!
//! Turns the operator's clean/build/debug/verbose switches into at most two
//! invocations of `make` (clean first, then build), captures what each one
//! prints, and derives a single process exit status from the result.

pub mod core;
pub mod ops;
pub mod tool;
pub mod util;

/// Test utilities and mocks for imgbuild unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{ExitOutcome, InvocationOutcome, InvocationRequest, ValidationError};
pub use ops::{run, RunOptions};
pub use tool::{BuildTool, MakeTool};
pub use util::config::Config;
