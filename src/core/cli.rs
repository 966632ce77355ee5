//! Command line interface for cp-font-gen
//!
//! Each subcommand maps to one runner in [`crate::core::runner`]. Options
//! carry long help so `cp-font-gen <command> --help` explains the
//! expected inputs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cp-font-gen CLI arguments
///
/// Examples:
///   cp-font-gen check                     # Are otf2bdf, bdftopcf and pyftsubset installed?
///   cp-font-gen generate                  # Build fonts from ./config.yaml
///   cp-font-gen generate -c clock.yaml -v # Build with detailed progress
///   cp-font-gen generate --debug          # Coverage analysis and debug manifest
///   cp-font-gen extract labels.txt        # List the characters a text uses
///   cp-font-gen show -c clock.yaml        # Preview the configured character set
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "cp-font-gen",
    version,
    about = "Generate minimal bitmap fonts for CircuitPython devices",
    long_about = "cp-font-gen subsets an outline font down to the characters a project needs and converts it into BDF and PCF bitmap fonts, one per point size, ready for displayio on CircuitPython boards."
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check if required tools are installed and show versions
    Check {
        #[clap(
            long,
            short = 'v',
            help = "Show detailed version information",
            long_help = "Also run each tool with --version (bounded to two seconds) and print the first line it reports."
        )]
        verbose: bool,
    },

    /// Generate fonts from a configuration file
    #[clap(alias = "run")]
    Generate {
        /// Path to the project configuration
        ///
        /// Relative character files in the configuration are resolved
        /// against this file's directory.
        #[clap(long, short = 'c', default_value = "config.yaml", help = "Path to configuration file")]
        config: PathBuf,

        #[clap(long = "dry-run", help = "Show what would be generated without generating")]
        dry_run: bool,

        #[clap(long, short = 'v', help = "Show detailed progress and debug information")]
        verbose: bool,

        #[clap(
            long,
            help = "Show everything including character coverage analysis",
            long_help = "Show everything including character coverage analysis and tool output, write a debug log file, and save the execution log into the manifest."
        )]
        debug: bool,
    },

    /// Extract unique characters from a text file
    Extract {
        /// UTF-8 text file to scan
        text_file: PathBuf,
    },

    /// Show what characters would be included from a configuration
    Show {
        #[clap(long, short = 'c', default_value = "config.yaml", help = "Path to configuration file")]
        config: PathBuf,
    },
}
