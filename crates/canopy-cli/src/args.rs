//! Command-line argument definitions for the Canopy CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the project to scan, the declaration
//! manifest, configuration file and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Canopy hierarchy diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Project directory to scan for scene files
    #[arg(help = "Path to the project directory")]
    pub project_dir: String,

    /// TOML manifest of `[[declaration]]` tables
    #[arg(short, long)]
    pub declarations: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Generate diagrams without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
