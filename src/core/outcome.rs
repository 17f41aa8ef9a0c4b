//! Results of tool invocations and of a whole driver run.

use std::fmt;
use std::process::Output;

/// Which action of the external tool an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Remove prior build outputs.
    Clean,
    /// The tool's default target.
    Build,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Clean => write!(f, "clean"),
            Action::Build => write!(f, "build"),
        }
    }
}

/// What a single completed invocation reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// Completion status; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationOutcome {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        InvocationOutcome {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<Output> for InvocationOutcome {
    fn from(output: Output) -> Self {
        InvocationOutcome {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// How a driver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// No invocation was requested.
    Idle,
    /// The build succeeded.
    Built,
    /// The build succeeded with debug instrumentation; a debugger must be attached.
    BuiltForDebugger,
    /// The build invocation reported a nonzero status.
    BuildFailed { exit_code: i32 },
}

/// Exit status when the operator must attach a debugger.
pub const EXIT_DEBUG_ATTACH: i32 = 1;

/// Exit status for a failed build when strict exit codes are enabled.
pub const EXIT_BUILD_FAILED_STRICT: i32 = 2;

impl ExitOutcome {
    /// Process exit status for this outcome.
    ///
    /// A failed build exits 0 unless `strict` is set.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            ExitOutcome::Idle | ExitOutcome::Built => 0,
            ExitOutcome::BuiltForDebugger => EXIT_DEBUG_ATTACH,
            ExitOutcome::BuildFailed { .. } if strict => EXIT_BUILD_FAILED_STRICT,
            ExitOutcome::BuildFailed { .. } => 0,
        }
    }
}
