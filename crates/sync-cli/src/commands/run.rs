//! `syncctl run` - one reconciliation pass

use std::path::Path;

use colored::Colorize;

use sync_supervisor::GroupAction;

use crate::context::Context;
use crate::error::{CliError, Result};
use crate::snapshot;

/// Sweep stale records, then reconcile the fleet against the filesystem
pub async fn run_pass(config_path: &Path) -> Result<()> {
    let context = Context::load(config_path)?;

    for name in context.supervisor.sweep().await? {
        println!(
            "{} worker for {} had died; record removed",
            "!".yellow().bold(),
            name.bold()
        );
    }

    let snapshot = snapshot::list_directories(Path::new(&context.manifest.core.local_root))?;
    let report = context
        .supervisor
        .run_pass(&context.manifest.rules, &snapshot)
        .await?;

    if report.outcomes.is_empty() {
        println!("No groups matched the current snapshot.");
        return Ok(());
    }

    for outcome in &report.outcomes {
        let verb = match outcome.action {
            GroupAction::Kept => "up to date",
            GroupAction::Started => "started",
            GroupAction::Restarted => "restarted",
        };
        match &outcome.result {
            Ok(()) => println!("{} {} {}", "ok".green().bold(), outcome.name.bold(), verb),
            Err(e) => println!(
                "{} {} {}: {}",
                "failed".red().bold(),
                outcome.name.bold(),
                verb,
                e
            ),
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::user("One or more groups failed; see above"))
    }
}
