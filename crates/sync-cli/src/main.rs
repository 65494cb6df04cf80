//! Sync fleet manager CLI
//!
//! `syncctl` partitions the directories under a configured root into sync
//! groups and keeps one replication worker running per group.

mod cli;
mod commands;
mod context;
mod error;
mod planner;
mod snapshot;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run => commands::run_pass(&cli.config).await,
        Commands::List => commands::run_list(&cli.config).await,
        Commands::Stop { name } => commands::run_stop(&cli.config, name.as_deref()).await,
        Commands::Check => commands::run_check(&cli.config),
    }
}
