//! Worker lifecycle management
//!
//! Launching records the worker in the registry; termination follows a
//! graceful-then-forceful protocol and only ever signals pids the registry
//! currently tracks. A termination that exhausts its budget leaves the
//! record in place so a later pass can retry cleanly.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use sync_core::{InstanceRecord, ShutdownSection, SyncGroup};
use sync_registry::InstanceStore;

use crate::error::{Result, SupervisorError};
use crate::launch::CommandPlanner;
use crate::process::ProcessControl;

/// Shutdown timing and escalation depth
///
/// An explicit policy value: how often liveness is polled, how many polls
/// the worker gets after the graceful interrupt, and how many more after
/// the forced kill before the operation reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownPolicy {
    /// Interval between liveness polls
    pub poll_interval: Duration,
    /// Poll attempts after the graceful interrupt
    pub graceful_attempts: u32,
    /// Poll attempts after the forced kill
    pub forced_attempts: u32,
}

impl Default for ShutdownPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(300),
            graceful_attempts: 20,
            forced_attempts: 10,
        }
    }
}

impl From<&ShutdownSection> for ShutdownPolicy {
    fn from(section: &ShutdownSection) -> Self {
        Self {
            poll_interval: Duration::from_millis(section.poll_interval_ms),
            graceful_attempts: section.graceful_attempts,
            forced_attempts: section.forced_attempts,
        }
    }
}

/// Starts, stops, and tracks replication worker processes
///
/// Cheap to clone: the registry, process control, and planner are shared
/// behind `Arc`s, which is what lets each group's work run as its own
/// task.
#[derive(Clone)]
pub struct Supervisor {
    store: Arc<dyn InstanceStore>,
    control: Arc<dyn ProcessControl>,
    planner: Arc<dyn CommandPlanner>,
    policy: ShutdownPolicy,
    startup_grace: Duration,
}

impl Supervisor {
    /// Create a supervisor over the given registry, process control, and
    /// command planner
    pub fn new(
        store: Arc<dyn InstanceStore>,
        control: Arc<dyn ProcessControl>,
        planner: Arc<dyn CommandPlanner>,
        policy: ShutdownPolicy,
    ) -> Self {
        Self {
            store,
            control,
            planner,
            policy,
            startup_grace: Duration::from_millis(250),
        }
    }

    /// Override the startup grace window (how long a worker is watched for
    /// an immediate exit after spawn)
    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }

    /// Launch the worker for a group and record it in the registry.
    ///
    /// The invocation comes from the command planner. A worker that exits
    /// inside the startup grace window fails the launch; nothing is
    /// recorded in that case.
    pub async fn launch(&self, group: &SyncGroup) -> Result<InstanceRecord> {
        let name = group.name.clone();
        let planned = self
            .planner
            .plan(group)
            .map_err(|source| SupervisorError::Launch {
                name: name.clone(),
                source,
            })?;

        debug!(group = %name, program = %planned.program.display(), "spawning worker");

        let mut command = Command::new(&planned.program);
        command
            .args(&planned.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = &planned.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| SupervisorError::Launch {
            name: name.clone(),
            source,
        })?;

        let Some(pid) = child.id() else {
            // Reaped before we could observe it; treat as an instant exit
            let status = child.wait().await.map_err(|source| SupervisorError::Launch {
                name: name.clone(),
                source,
            })?;
            return Err(SupervisorError::ExitedEarly { name, status });
        };

        // Watch the grace window; a worker with nothing to do for us dies
        // here instead of being recorded
        match tokio::time::timeout(self.startup_grace, child.wait()).await {
            Ok(Ok(status)) => {
                return Err(SupervisorError::ExitedEarly { name, status });
            }
            Ok(Err(source)) => {
                return Err(SupervisorError::Launch { name, source });
            }
            Err(_still_running) => {}
        }

        let record = InstanceRecord::new(
            name.clone(),
            pid,
            group.fingerprint(),
            group.directories.clone(),
        );
        self.store.put(record.clone())?;
        info!(group = %name, pid, "worker launched");

        // The child handle is dropped here; the worker keeps running on
        // its own and is tracked by pid from now on.
        Ok(record)
    }

    /// Terminate the tracked worker of a group.
    ///
    /// Refuses with [`SupervisorError::NotTracked`] unless `expected_pid`
    /// is recorded under this group in the current registry snapshot; the
    /// supervisor never signals a process it did not launch. On confirmed
    /// death the record is removed. If the worker survives the graceful
    /// budget it is force-killed; surviving that too leaves the record in
    /// place and reports [`SupervisorError::TerminationTimeout`].
    pub async fn terminate(&self, name: &str, expected_pid: u32) -> Result<()> {
        let records = self.store.list()?;
        let tracked = records
            .iter()
            .any(|r| r.name == name && r.pid == expected_pid);
        if !tracked {
            return Err(SupervisorError::NotTracked {
                name: name.to_string(),
                pid: expected_pid,
            });
        }

        debug!(group = name, pid = expected_pid, "interrupting worker");
        self.control
            .interrupt(expected_pid)
            .await
            .map_err(|source| SupervisorError::Signal {
                name: name.to_string(),
                pid: expected_pid,
                source,
            })?;

        if self.wait_for_death(expected_pid, self.policy.graceful_attempts).await {
            self.store.remove(name)?;
            info!(group = name, pid = expected_pid, "worker stopped");
            return Ok(());
        }

        warn!(
            group = name,
            pid = expected_pid,
            "worker ignored interrupt, escalating to forced kill"
        );
        self.control
            .force_kill(expected_pid)
            .await
            .map_err(|source| SupervisorError::Signal {
                name: name.to_string(),
                pid: expected_pid,
                source,
            })?;

        if self.wait_for_death(expected_pid, self.policy.forced_attempts).await {
            self.store.remove(name)?;
            info!(group = name, pid = expected_pid, "worker force-killed");
            return Ok(());
        }

        Err(SupervisorError::TerminationTimeout {
            name: name.to_string(),
            pid: expected_pid,
        })
    }

    /// Drop registry records whose process no longer exists.
    ///
    /// Returns the names of the pruned groups. Workers that died behind
    /// the supervisor's back leave stale records; pruning them lets the
    /// next pass start replacements.
    pub async fn sweep(&self) -> Result<Vec<String>> {
        let mut pruned = Vec::new();
        for record in self.store.list()? {
            if !self.control.is_alive(record.pid).await {
                warn!(group = %record.name, pid = record.pid, "recorded worker is gone");
                self.store.remove(&record.name)?;
                pruned.push(record.name);
            }
        }
        Ok(pruned)
    }

    /// Poll liveness until the process disappears or the attempt budget
    /// runs out, ending with one final check
    async fn wait_for_death(&self, pid: u32, attempts: u32) -> bool {
        for _ in 0..attempts {
            if !self.control.is_alive(pid).await {
                return true;
            }
            tokio::time::sleep(self.policy.poll_interval).await;
        }
        !self.control.is_alive(pid).await
    }

    pub(crate) fn store(&self) -> &Arc<dyn InstanceStore> {
        &self.store
    }
}
