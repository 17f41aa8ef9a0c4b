//! Core data structures.
//!
//! - Operator intent ([`InvocationRequest`]) and its validation into a [`Plan`]
//! - Per-invocation results ([`InvocationOutcome`]) and the run result ([`ExitOutcome`])

pub mod outcome;
pub mod request;

pub use outcome::{Action, ExitOutcome, InvocationOutcome};
pub use request::{validate, Invocation, InvocationRequest, Plan, ValidationError};
