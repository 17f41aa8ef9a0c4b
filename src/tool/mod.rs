//! The external build tool.
//!
//! The driver never looks inside the build: it hands an [`Invocation`] to a
//! [`BuildTool`] and gets back an [`InvocationOutcome`]. [`MakeTool`] is the
//! real implementation, running `make -f <makefile> [clean] [DEBUG=1]`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::{Action, Invocation, InvocationOutcome};
use crate::util::config::ToolConfig;
use crate::util::process::{resolve_program, ProcessBuilder};

/// Something that can carry out tool invocations.
///
/// An `Err` means the invocation could not be carried out at all (the tool
/// could not be started). A tool that ran and failed is an `Ok` outcome with
/// a nonzero exit code.
pub trait BuildTool {
    /// Command line for `invocation`, for progress output.
    fn describe(&self, invocation: &Invocation) -> String;

    /// Run `invocation` to completion.
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutcome>;
}

/// `make` driven by a fixed makefile.
#[derive(Debug, Clone)]
pub struct MakeTool {
    program: PathBuf,
    makefile: PathBuf,
    clean_target: String,
    debug_define: String,
}

impl MakeTool {
    /// Create a tool with the stock `clean` target and `DEBUG=1` define.
    pub fn new(program: impl AsRef<Path>, makefile: impl AsRef<Path>) -> Self {
        MakeTool {
            program: program.as_ref().to_path_buf(),
            makefile: makefile.as_ref().to_path_buf(),
            clean_target: "clean".to_string(),
            debug_define: "DEBUG=1".to_string(),
        }
    }

    /// Create a tool from configuration.
    pub fn from_config(config: &ToolConfig) -> Self {
        MakeTool {
            program: config.program.clone(),
            makefile: config.makefile.clone(),
            clean_target: config.clean_target.clone(),
            debug_define: config.debug_define.clone(),
        }
    }

    fn command(&self, program: &Path, invocation: &Invocation) -> ProcessBuilder {
        let cmd = ProcessBuilder::new(program)
            .arg("-f")
            .arg(&self.makefile);

        match invocation.action {
            Action::Clean => cmd.arg(&self.clean_target),
            Action::Build if invocation.debug => cmd.arg(&self.debug_define),
            Action::Build => cmd,
        }
    }
}

impl BuildTool for MakeTool {
    fn describe(&self, invocation: &Invocation) -> String {
        self.command(&self.program, invocation).display_command()
    }

    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutcome> {
        // Resolved per call so a run that invokes nothing never needs the tool.
        let program = resolve_program(&self.program)?;
        let output = self.command(&program, invocation).exec()?;
        let outcome = InvocationOutcome::from(output);

        tracing::debug!(
            "{} finished with exit code {} ({} bytes stdout, {} bytes stderr)",
            invocation.action,
            outcome.exit_code,
            outcome.stdout.len(),
            outcome.stderr.len()
        );

        Ok(outcome)
    }
}
