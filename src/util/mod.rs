//! Shared utilities

pub mod config;
pub mod process;
pub mod shell;

pub use config::Config;
pub use shell::Shell;
