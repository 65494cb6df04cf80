//! Worker invocation planning for the replication binary
//!
//! Renders one invocation per group: both replication roots, one `-path`
//! per selected directory (relative to the local root, highest priority
//! first), batch mode, and the group name as the label.

use std::io;
use std::path::PathBuf;

use sync_core::{Manifest, SyncGroup};
use sync_supervisor::{CommandPlanner, WorkerCommand};

/// Plans invocations of the external replication binary
#[derive(Debug, Clone)]
pub struct WorkerPlanner {
    worker_path: PathBuf,
    local_root: PathBuf,
    remote_root: String,
}

impl WorkerPlanner {
    /// Create a planner for the given binary and roots
    pub fn new(
        worker_path: impl Into<PathBuf>,
        local_root: impl Into<PathBuf>,
        remote_root: impl Into<String>,
    ) -> Self {
        Self {
            worker_path: worker_path.into(),
            local_root: local_root.into(),
            remote_root: remote_root.into(),
        }
    }

    /// Build the planner from a parsed manifest
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self::new(
            &manifest.core.worker_path,
            &manifest.core.local_root,
            &manifest.core.remote_root,
        )
    }
}

impl CommandPlanner for WorkerPlanner {
    fn plan(&self, group: &SyncGroup) -> io::Result<WorkerCommand> {
        let mut command = WorkerCommand::new(&self.worker_path)
            .arg("-root")
            .arg(self.local_root.display().to_string())
            .arg("-root")
            .arg(&self.remote_root)
            .arg("-batch")
            .arg("-label")
            .arg(&group.name);

        for dir in &group.directories {
            let relative = dir.strip_prefix(&self.local_root).unwrap_or(dir);
            command = command.arg("-path").arg(relative.display().to_string());
        }

        Ok(command)
    }
}
