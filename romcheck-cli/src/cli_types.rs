//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "romcheck")]
#[command(about = "Validate ROM files against a JSON manifest", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for the validate command.
#[derive(Args, Clone, Debug)]
pub(crate) struct ValidateArgs {
    /// ROM files to validate
    pub roms: Vec<PathBuf>,

    /// Manifest (JSON) describing the expected set
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Per-read timeout in seconds (0 disables; overrides settings)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Skip the manifest size/SHA-1 comparison
    #[arg(long)]
    pub no_integrity: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Detect formats and check files against a manifest
    Validate(ValidateArgs),

    /// List all supported formats
    List,

    /// Show settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective validation settings
    Show,

    /// Print the settings file path
    Path,
}
