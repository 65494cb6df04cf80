//! Wiring a manifest into live components

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use sync_core::Manifest;
use sync_registry::{FileStore, InstanceStore};
use sync_supervisor::{OsProcessControl, ShutdownPolicy, Supervisor};

use crate::error::{CliError, Result};
use crate::planner::WorkerPlanner;

/// Everything a command needs: the parsed manifest, the registry, and a
/// wired supervisor
pub struct Context {
    pub manifest: Manifest,
    pub store: Arc<dyn InstanceStore>,
    pub supervisor: Arc<Supervisor>,
}

impl Context {
    /// Load the manifest and wire up the supervisor stack
    pub fn load(config_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(config_path).map_err(|e| match e {
            sync_core::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                CliError::user(format!(
                    "Config file {} not found",
                    config_path.display()
                ))
            }
            other => CliError::from(other),
        })?;

        ensure_roots(&manifest)?;

        let store = Arc::new(FileStore::open(Path::new(&manifest.core.state_dir))?);
        let planner = Arc::new(WorkerPlanner::from_manifest(&manifest));
        let supervisor = Arc::new(Supervisor::new(
            Arc::clone(&store) as Arc<dyn InstanceStore>,
            Arc::new(OsProcessControl::new()),
            planner,
            ShutdownPolicy::from(&manifest.shutdown),
        ));

        debug!(
            local_root = %manifest.core.local_root,
            state_dir = %manifest.core.state_dir,
            rules = manifest.rules.len(),
            "context loaded"
        );

        Ok(Self {
            manifest,
            store,
            supervisor,
        })
    }
}

/// Create the local root when configured to, otherwise require it
fn ensure_roots(manifest: &Manifest) -> Result<()> {
    let local_root = Path::new(&manifest.core.local_root);
    if !local_root.is_dir() {
        if manifest.core.make_root_directories {
            fs::create_dir_all(local_root)?;
        } else {
            return Err(CliError::user(format!(
                "Local root {} does not exist",
                local_root.display()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, make_roots: bool) -> std::path::PathBuf {
        let root = temp.path().join("data");
        let state = temp.path().join("state");
        let config_path = temp.path().join("syncctl.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        write!(
            file,
            r#"
[core]
local_root = "{}"
remote_root = "ssh://replica//data"
state_dir = "{}"
make_root_directories = {}
"#,
            root.display(),
            state.display(),
            make_roots
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_load_creates_missing_roots_when_allowed() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(&temp, true);

        let context = Context::load(&config_path).unwrap();

        assert!(temp.path().join("data").is_dir());
        assert!(context.store.list().unwrap().is_empty());
    }

    #[test]
    fn test_load_requires_root_when_creation_disabled() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(&temp, false);

        let result = Context::load(&config_path);
        assert!(matches!(result, Err(CliError::User(_))));
    }

    #[test]
    fn test_missing_config_file_is_a_user_error() {
        let temp = TempDir::new().unwrap();
        let result = Context::load(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::User(_))));
    }
}
