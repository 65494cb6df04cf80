//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Supervises a fleet of replication worker processes
#[derive(Debug, Parser)]
#[command(name = "syncctl", version, about)]
pub struct Cli {
    /// Path to the fleet configuration file
    #[arg(short, long, default_value = "syncctl.toml", env = "SYNCCTL_CONFIG")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one reconciliation pass: start, keep, or restart workers
    Run,
    /// List tracked worker instances and their liveness
    List,
    /// Stop a tracked worker, or all of them
    Stop {
        /// Group to stop; omit to stop every tracked worker
        name: Option<String>,
    },
    /// Show what a pass would do without touching any process
    Check,
}
