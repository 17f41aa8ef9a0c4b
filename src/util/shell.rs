//! Centralized output for the driver.
//!
//! The report (acknowledgments, echoed tool output, progress lines) goes to
//! the shell's `out` stream; tool diagnostics go to `err`. Both are plain
//! [`Write`] sinks so tests can capture them.
//!
//! Progress lines use a right-aligned 12-column status label and are only
//! printed in verbose mode.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use thiserror::Error;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Acknowledgments and diagnostics only
    #[default]
    Normal,
    /// --verbose: progress lines and captured tool output
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color choice '{0}'; expected 'auto', 'always', or 'never'")]
pub struct InvalidColorChoice(pub String);

impl std::str::FromStr for ColorChoice {
    type Err = InvalidColorChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(InvalidColorChoice(s.to_string())),
        }
    }
}

/// Status labels for progress lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Cleaning,
    Building,
    Failed,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Cleaning => "Cleaning",
            Status::Building => "Building",
            Status::Failed => "Failed",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            // In-progress: bold cyan
            Status::Cleaning | Status::Building => "\x1b[1;36m",
            // Error: bold red
            Status::Failed => "\x1b[1;31m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Output sink for one driver run.
pub struct Shell {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a shell writing to arbitrary sinks.
    pub fn new(
        out: Box<dyn Write>,
        err: Box<dyn Write>,
        verbosity: Verbosity,
        color: ColorChoice,
    ) -> Self {
        // Arbitrary sinks are never treated as terminals.
        let use_color = color == ColorChoice::Always;

        Shell {
            out,
            err,
            verbosity,
            use_color,
        }
    }

    /// Create a shell on the process's stdout and stderr.
    pub fn stdio(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            verbosity,
            use_color,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a progress line. Verbose mode only.
    ///
    /// Format: `{status:>12} {message}`
    pub fn status(&mut self, status: Status, msg: impl Display) {
        if !self.is_verbose() {
            return;
        }

        let prefix = self.format_status(status);
        let _ = writeln!(self.out, "{} {}", prefix, msg);
    }

    /// Print a line of the report.
    pub fn println(&mut self, msg: impl Display) {
        let _ = writeln!(self.out, "{}", msg);
    }

    /// Print a line of diagnostics.
    pub fn eprintln(&mut self, msg: impl Display) {
        let _ = writeln!(self.err, "{}", msg);
    }

    /// Flush both streams.
    pub fn flush(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("verbosity", &self.verbosity)
            .field("use_color", &self.use_color)
            .finish_non_exhaustive()
    }
}
