//! The build driver: validate, optionally clean, optionally build, report.
//!
//! The sequence is linear. It stops early only for an invalid request; a
//! tool that runs and fails never stops it. The final status comes from the
//! last invocation actually run.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{
    Action, ExitOutcome, Invocation, InvocationOutcome, InvocationRequest, Plan, ValidationError,
};
use crate::tool::BuildTool;
use crate::util::config::Config;
use crate::util::shell::{Shell, Status};

/// Exit status for usage and validation errors.
pub const EXIT_USAGE: i32 = 1;

/// Report-side settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Image named in the debug-attachment notice.
    pub artifact: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions::from_config(&Config::default())
    }
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        RunOptions {
            artifact: config.output.artifact.clone(),
        }
    }
}

/// Why a run stopped without an [`ExitOutcome`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// The request was rejected before any invocation ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The tool could not be run at all.
    #[error(transparent)]
    Tool(#[from] anyhow::Error),
}

/// Run every invocation `request` calls for and report the result.
pub fn run(
    request: &InvocationRequest,
    tool: &mut dyn BuildTool,
    shell: &mut Shell,
    options: &RunOptions,
) -> Result<ExitOutcome, DriverError> {
    let plan = Plan::from_request(request)?;
    tracing::debug!("plan: {:?}", plan);

    let mut last: Option<(Invocation, InvocationOutcome)> = None;
    for invocation in plan.invocations() {
        let outcome = step(tool, shell, &invocation, request.verbose)?;
        last = Some((invocation, outcome));
    }

    let outcome = match last {
        Some((invocation, outcome)) => report(shell, &invocation, &outcome, request.verbose, options),
        None => {
            tracing::debug!("nothing to do");
            ExitOutcome::Idle
        }
    };

    shell.flush();
    Ok(outcome)
}

/// Print the explanation for a rejected request.
pub fn report_validation_error(shell: &mut Shell, error: &ValidationError) {
    shell.println(format!("ERROR: {}", error));
    shell.flush();
}

/// Run one invocation and surface what only this step can report.
fn step(
    tool: &mut dyn BuildTool,
    shell: &mut Shell,
    invocation: &Invocation,
    verbose: bool,
) -> anyhow::Result<InvocationOutcome> {
    let status = match invocation.action {
        Action::Clean => Status::Cleaning,
        Action::Build => Status::Building,
    };
    shell.status(status, tool.describe(invocation));

    let outcome = tool.invoke(invocation)?;

    if invocation.action == Action::Clean {
        if verbose {
            echo(shell, &outcome.stdout);
        }
        if !outcome.success() {
            // The build still runs, but the clean's diagnostics must not be lost.
            shell.eprintln(format!("Clean failed (exit code {}).", outcome.exit_code));
            echo_err(shell, &outcome.stderr);
        }
    }

    Ok(outcome)
}

fn report(
    shell: &mut Shell,
    invocation: &Invocation,
    outcome: &InvocationOutcome,
    verbose: bool,
    options: &RunOptions,
) -> ExitOutcome {
    if !outcome.success() {
        if verbose {
            shell.println("Output:");
            echo(shell, &outcome.stdout);
        }
        shell.status(Status::Failed, format!("exit code {}", outcome.exit_code));
        shell.println("Make failed.");
        shell.eprintln("Error:");
        echo_err(shell, &outcome.stderr);
        return ExitOutcome::BuildFailed {
            exit_code: outcome.exit_code,
        };
    }

    shell.println("Make succeeded. :3");
    if verbose {
        shell.println("Output:");
        echo(shell, &outcome.stdout);
    }

    if invocation.action == Action::Build && invocation.debug {
        shell.println(format!(
            "Debug mode activated. Activate debugger on {}",
            options.artifact.display()
        ));
        return ExitOutcome::BuiltForDebugger;
    }

    ExitOutcome::Built
}

fn echo(shell: &mut Shell, text: &str) {
    if !text.is_empty() {
        shell.println(text.trim_end_matches('\n'));
    }
}

fn echo_err(shell: &mut Shell, text: &str) {
    if !text.is_empty() {
        shell.eprintln(text.trim_end_matches('\n'));
    }
}
