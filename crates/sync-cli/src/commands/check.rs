//! `syncctl check` - dry reconciliation

use std::path::Path;

use colored::Colorize;

use sync_core::{Decision, evaluate, reconcile};

use crate::context::Context;
use crate::error::Result;
use crate::snapshot;

/// Evaluate and reconcile, printing the decisions without executing any
pub fn run_check(config_path: &Path) -> Result<()> {
    let context = Context::load(config_path)?;

    let snapshot = snapshot::list_directories(Path::new(&context.manifest.core.local_root))?;
    let desired = evaluate(&context.manifest.rules, &snapshot)?;
    let records = context.store.list()?;
    let decisions = reconcile(&desired, &records);

    if decisions.is_empty() {
        println!("No groups matched the current snapshot.");
        return Ok(());
    }

    for decision in &decisions {
        match decision {
            Decision::Keep { name } => {
                println!("{} {} up to date", "=".dimmed(), name.bold());
            }
            Decision::Start { group } => {
                println!(
                    "{} would start {} ({} dirs)",
                    "+".green().bold(),
                    group.name.bold(),
                    group.directories.len()
                );
            }
            Decision::Restart { group, old_pid } => {
                println!(
                    "{} would restart {} (stopping pid {})",
                    "~".yellow().bold(),
                    group.name.bold(),
                    old_pid
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir) -> std::path::PathBuf {
        let root = temp.path().join("data");
        fs::create_dir_all(root.join("11a")).unwrap();
        fs::create_dir_all(root.join("11b")).unwrap();

        let config_path = temp.path().join("syncctl.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        write!(
            file,
            r#"
[core]
local_root = "{}"
remote_root = "ssh://replica//data"
state_dir = "{}"

[[rules]]
name = "orders"
pattern = "11*"
sort_method = "name_desc"
"#,
            root.display(),
            temp.path().join("state").display()
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_check_reports_without_touching_state() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(&temp);

        run_check(&config_path).unwrap();

        // Dry run: the registry stays empty
        let context = Context::load(&config_path).unwrap();
        assert!(context.store.list().unwrap().is_empty());
    }
}
