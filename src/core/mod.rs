//! Command-line application layer
//!
//! Argument parsing, the tool-wide user config, and the runners that tie
//! the library together for the `cp-font-gen` binary.

pub mod cli;
pub mod config_file;
pub mod platform;
pub mod runner;

pub use cli::CliArgs;
pub use runner::run_app;
