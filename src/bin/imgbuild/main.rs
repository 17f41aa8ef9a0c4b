//! imgbuild CLI - clean and build the runnable image with make

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

mod cli;

use imgbuild::ops::{self, report_validation_error, DriverError, RunOptions, EXIT_USAGE};
use imgbuild::util::config::load_config;
use imgbuild::util::shell::{Shell, Verbosity};
use imgbuild::{core::validate, MakeTool};

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            EXIT_USAGE
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let request = match cli::parse(std::env::args_os()) {
        Ok(request) => request,
        Err(e) => return Ok(usage_error(e)),
    };

    init_logging(request.verbose);

    if let Err(e) = validate(&request) {
        let mut shell = Shell::stdio(Verbosity::Normal, Default::default());
        report_validation_error(&mut shell, &e);
        return Ok(EXIT_USAGE);
    }

    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let config = load_config(&cwd);

    let verbosity = if request.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    let mut shell = Shell::stdio(verbosity, config.color());
    let mut tool = MakeTool::from_config(&config.tool);
    let options = RunOptions::from_config(&config);

    match ops::run(&request, &mut tool, &mut shell, &options) {
        Ok(outcome) => Ok(outcome.exit_code(config.report.strict_exit)),
        Err(DriverError::Validation(e)) => {
            report_validation_error(&mut shell, &e);
            Ok(EXIT_USAGE)
        }
        Err(DriverError::Tool(e)) => Err(e),
    }
}

/// Print help or a usage error and pick the exit status.
///
/// Help is a usage error too: it exits 1.
fn usage_error(e: clap::Error) -> i32 {
    match e.kind() {
        ErrorKind::DisplayHelp => {
            let _ = e.print();
            EXIT_USAGE
        }
        _ => {
            let _ = e.print();
            eprintln!();
            eprint!("{}", cli::help_text());
            EXIT_USAGE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("imgbuild=debug")
        } else {
            EnvFilter::new("imgbuild=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
