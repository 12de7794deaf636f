//! # Odometer CLI Module
//!
//! ## Available Commands
//!
//! - `run` - Advance the meter and print its readout
//! - `layout` - Show the resolved stage table
//! - `check` - Validate a layout configuration
//! - `init` - Write the default configuration to a file

mod commands;

use clap::{Parser, Subcommand};
use odometer_core::OdometerError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Odometer - cascading counter
///
/// A chain of bounded stages where each tick of the least significant stage
/// may ripple a carry through successively coarser ones.
#[derive(Parser, Debug)]
#[command(name = "odometer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Layout configuration file (TOML); the operating-hours meter if omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Advance the meter and print the readout
    Run {
        /// Number of ticks to apply
        #[arg(short, long)]
        ticks: u64,

        /// Print the readout every N ticks instead of only at the end
        #[arg(short, long)]
        every: Option<u64>,
    },

    /// Show the resolved stage table
    Layout,

    /// Validate the configured layout
    Check,

    /// Write the default configuration to a file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "odometer.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), OdometerError> {
    let config = cli.config.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Run { ticks, every }) => {
            cmd_run(config, json_mode, cli.verbose, ticks, every).map(|_| ())
        }
        Some(Commands::Layout) | None => cmd_layout(config, json_mode),
        Some(Commands::Check) => cmd_check(config, json_mode),
        Some(Commands::Init { output, force }) => cmd_init(&output, force),
    }
}
