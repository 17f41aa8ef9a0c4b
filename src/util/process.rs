//! Subprocess execution utilities.
//!
//! Child processes inherit the environment and working directory of the
//! driver unchanged. Output is captured in full and only handed back once the
//! child has exited.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{anyhow, Context, Result};

/// Builder for a captured subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Run to completion with stdout and stderr captured.
    ///
    /// Blocks until the child exits; there is no timeout. A nonzero exit
    /// status is not an error here, only a failure to start or wait is.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("running `{}`", self.display_command());

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{}`", self.program.display()))
    }

    /// Display the command for messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: impl AsRef<OsStr>) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Resolve the build tool program, failing with a readable message.
///
/// Paths containing a separator are checked directly, bare names are looked
/// up in PATH.
pub fn resolve_program(program: &Path) -> Result<PathBuf> {
    find_executable(program)
        .ok_or_else(|| anyhow!("could not find `{}` in PATH", program.display()))
}
