//! CLI definitions using clap.

use clap::{CommandFactory, Parser};

use imgbuild::InvocationRequest;

/// Build the runnable image, stored in out/bin/main
#[derive(Debug, Parser)]
#[command(name = "imgbuild")]
#[command(about, long_about = None)]
pub struct Cli {
    /// Clean up out folder
    #[arg(short, long)]
    pub clean: bool,

    /// Build and compile image
    #[arg(short, long)]
    pub build: bool,

    /// Pass in debugger points to final image
    #[arg(short, long)]
    pub debug: bool,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn request(&self) -> InvocationRequest {
        InvocationRequest::new()
            .with_clean(self.clean)
            .with_build(self.build)
            .with_debug(self.debug)
            .with_verbose(self.verbose)
    }
}

/// Parse operator arguments (including the program name) into a request.
pub fn parse<I, T>(args: I) -> Result<InvocationRequest, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map(|cli| cli.request())
}

/// Full help text, for printing after a usage error.
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}
