//! Operator intent and its validation.
//!
//! An [`InvocationRequest`] is built once from the command line and never
//! mutated. Before anything runs it is turned into a [`Plan`], which has no
//! way to express "clean without build": that combination is rejected by
//! [`validate`] and so can never reach the driver.

use thiserror::Error;

use crate::core::Action;

/// The four operator switches, exactly as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Remove prior build outputs.
    pub clean: bool,
    /// Run the default build action.
    pub build: bool,
    /// Ask the build to embed debug instrumentation.
    pub debug: bool,
    /// Echo captured tool output.
    pub verbose: bool,
}

impl InvocationRequest {
    /// Create a request with every switch off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_build(mut self, build: bool) -> Self {
        self.build = build;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// A semantically invalid flag combination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Cleaning would delete the image and nothing would rebuild it.
    #[error("Cleaning file system but not building. No image will be created.")]
    CleanWithoutBuild,
}

/// Reject combinations that would destroy outputs without producing new ones.
///
/// Only `clean` without `build` is rejected. `debug` and `verbose` are legal
/// with anything, and a request with neither `clean` nor `build` is a valid
/// no-op.
pub fn validate(request: &InvocationRequest) -> Result<(), ValidationError> {
    if request.clean && !request.build {
        return Err(ValidationError::CleanWithoutBuild);
    }
    Ok(())
}

/// One request to the external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub action: Action,
    /// Pass the debug parameter. Only meaningful for [`Action::Build`].
    pub debug: bool,
}

impl Invocation {
    pub fn clean() -> Self {
        Invocation {
            action: Action::Clean,
            debug: false,
        }
    }

    pub fn build(debug: bool) -> Self {
        Invocation {
            action: Action::Build,
            debug,
        }
    }
}

/// The validated sequence of tool invocations for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Nothing was requested.
    Idle,
    /// Optionally clean, then build.
    Build { clean: bool, debug: bool },
}

impl Plan {
    /// Validate `request` and derive the invocations it calls for.
    pub fn from_request(request: &InvocationRequest) -> Result<Self, ValidationError> {
        validate(request)?;

        if !request.build {
            return Ok(Plan::Idle);
        }

        Ok(Plan::Build {
            clean: request.clean,
            debug: request.debug,
        })
    }

    /// The invocations to run, in order. A clean always precedes the build.
    pub fn invocations(&self) -> Vec<Invocation> {
        match *self {
            Plan::Idle => Vec::new(),
            Plan::Build { clean: true, debug } => {
                vec![Invocation::clean(), Invocation::build(debug)]
            }
            Plan::Build { clean: false, debug } => vec![Invocation::build(debug)],
        }
    }
}
