//! `syncctl stop` - terminate tracked workers

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tokio::task::JoinSet;
use tracing::error;

use sync_supervisor::SupervisorError;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Stop one named worker, or every tracked worker.
///
/// Terminations run concurrently so one stubborn worker cannot stall the
/// rest; each result is reported on its own line.
pub async fn run_stop(config_path: &Path, name: Option<&str>) -> Result<()> {
    let context = Context::load(config_path)?;
    let records = context.store.list()?;

    let targets: Vec<_> = match name {
        Some(wanted) => {
            let found: Vec<_> = records.into_iter().filter(|r| r.name == wanted).collect();
            if found.is_empty() {
                return Err(CliError::user(format!(
                    "No tracked instance named '{}'",
                    wanted
                )));
            }
            found
        }
        None => records,
    };

    if targets.is_empty() {
        println!("Nothing to stop.");
        return Ok(());
    }

    let mut tasks: JoinSet<(String, u32, std::result::Result<(), SupervisorError>)> =
        JoinSet::new();
    for record in targets {
        let supervisor = Arc::clone(&context.supervisor);
        tasks.spawn(async move {
            let result = supervisor.terminate(&record.name, record.pid).await;
            (record.name, record.pid, result)
        });
    }

    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, pid, Ok(()))) => {
                println!("{} stopped {} (pid {})", "ok".green().bold(), name.bold(), pid);
            }
            Ok((name, _pid, Err(e))) => {
                failures += 1;
                println!("{} {}: {}", "failed".red().bold(), name.bold(), e);
            }
            Err(join_error) => {
                failures += 1;
                error!(%join_error, "stop task aborted");
            }
        }
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(CliError::user("Some workers could not be stopped; see above"))
    }
}
