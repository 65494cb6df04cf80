//! `syncctl list` - tracked instances and their liveness

use std::path::Path;

use colored::Colorize;

use sync_supervisor::{OsProcessControl, ProcessControl};

use crate::context::Context;
use crate::error::Result;

/// Print every tracked instance with a live/dead verdict
pub async fn run_list(config_path: &Path) -> Result<()> {
    let context = Context::load(config_path)?;
    let records = context.store.list()?;

    if records.is_empty() {
        println!("No tracked instances.");
        return Ok(());
    }

    let control = OsProcessControl::new();
    for record in records {
        let status = if control.is_alive(record.pid).await {
            "running".green()
        } else {
            "dead".red()
        };
        println!(
            "{:<24} pid {:<8} {:<8} {} dirs, since {}",
            record.name.bold(),
            record.pid,
            status,
            record.directories.len(),
            record.started_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    Ok(())
}
