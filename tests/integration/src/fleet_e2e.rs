//! End-to-end fleet supervision against real processes
//!
//! Exercises the full flow with a file-backed registry and a stub worker
//! binary: partition the tree, launch workers, keep them on an unchanged
//! pass, replace them when the tree changes, and stop everything. A fresh
//! supervisor is wired for every pass so the registry file is what carries
//! state between passes, as it does between real invocations.

#![cfg(unix)]

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use sync_core::{SelectionRule, SyncGroup};
use sync_registry::{FileStore, InstanceStore};
use sync_supervisor::{
    CommandPlanner, GroupAction, OsProcessControl, ProcessControl, ShutdownPolicy, Supervisor,
    WorkerCommand,
};

/// Planner that launches the stub worker script instead of a real
/// replication binary
struct StubPlanner {
    worker: PathBuf,
}

impl CommandPlanner for StubPlanner {
    fn plan(&self, group: &SyncGroup) -> io::Result<WorkerCommand> {
        let mut command = WorkerCommand::new(&self.worker).arg("-label").arg(&group.name);
        for dir in &group.directories {
            command = command.arg("-path").arg(dir.display().to_string());
        }
        Ok(command)
    }
}

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new(dirs: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        fs::create_dir(&data).unwrap();
        for dir in dirs {
            fs::create_dir(data.join(dir)).unwrap();
        }

        // Stub worker: ignores its arguments and stays alive
        let worker = temp.path().join("worker.sh");
        fs::write(&worker, "#!/bin/sh\nexec sleep 60\n").unwrap();
        let mut perms = fs::metadata(&worker).unwrap().permissions();
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o755);
        fs::set_permissions(&worker, perms).unwrap();

        Self { temp }
    }

    fn add_dir(&self, name: &str) {
        fs::create_dir(self.temp.path().join("data").join(name)).unwrap();
    }

    fn snapshot(&self) -> BTreeSet<PathBuf> {
        let mut snapshot = BTreeSet::new();
        for entry in fs::read_dir(self.temp.path().join("data")).unwrap() {
            let entry = entry.unwrap();
            if entry.path().is_dir() {
                snapshot.insert(entry.path());
            }
        }
        snapshot
    }

    /// Wire a fresh supervisor over the persistent registry, as a new
    /// invocation would
    fn supervisor(&self) -> Arc<Supervisor> {
        let store = Arc::new(FileStore::open(&self.temp.path().join("state")).unwrap());
        Arc::new(Supervisor::new(
            store,
            Arc::new(OsProcessControl::new()),
            Arc::new(StubPlanner {
                worker: self.temp.path().join("worker.sh"),
            }),
            ShutdownPolicy {
                poll_interval: Duration::from_millis(50),
                graceful_attempts: 40,
                forced_attempts: 10,
            },
        ))
    }

    fn store(&self) -> FileStore {
        FileStore::open(&self.temp.path().join("state")).unwrap()
    }
}

fn rules() -> Vec<SelectionRule> {
    vec![
        SelectionRule {
            name: "batch1".to_string(),
            pattern: "11*".to_string(),
            sort_method: "name_desc".to_string(),
            take: Some(3),
            skip: None,
            allow_overlap: false,
        },
        SelectionRule {
            name: "rest".to_string(),
            pattern: "*".to_string(),
            sort_method: "name_asc".to_string(),
            take: None,
            skip: None,
            allow_overlap: true,
        },
    ]
}

fn dir_names(path: &Path, dirs: &[PathBuf]) -> Vec<String> {
    let root = path.join("data");
    dirs.iter()
        .map(|d| d.strip_prefix(&root).unwrap().display().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_fleet_lifecycle() {
    let fixture = Fixture::new(&["11a", "11b", "11c", "11d", "O1"]);
    let control = OsProcessControl::new();

    // First pass: both groups start
    let report = fixture
        .supervisor()
        .run_pass(&rules(), &fixture.snapshot())
        .await
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded(GroupAction::Started), 2);

    let store = fixture.store();
    let batch1 = store.get("batch1").unwrap().unwrap();
    let rest = store.get("rest").unwrap().unwrap();
    assert_eq!(
        dir_names(fixture.temp.path(), &batch1.directories),
        vec!["11d", "11c", "11b"]
    );
    assert_eq!(
        dir_names(fixture.temp.path(), &rest.directories),
        vec!["11a", "11b", "11c", "11d", "O1"]
    );
    assert!(control.is_alive(batch1.pid).await);
    assert!(control.is_alive(rest.pid).await);

    // Second pass over an unchanged tree: pure no-op
    let report = fixture
        .supervisor()
        .run_pass(&rules(), &fixture.snapshot())
        .await
        .unwrap();
    assert_eq!(report.succeeded(GroupAction::Kept), 2);
    assert_eq!(report.succeeded(GroupAction::Started), 0);
    assert_eq!(report.succeeded(GroupAction::Restarted), 0);
    assert_eq!(store.get("batch1").unwrap().unwrap().pid, batch1.pid);
    assert_eq!(store.get("rest").unwrap().unwrap().pid, rest.pid);

    // A new directory shifts both groups; both workers are replaced
    fixture.add_dir("11e");
    let report = fixture
        .supervisor()
        .run_pass(&rules(), &fixture.snapshot())
        .await
        .unwrap();
    assert!(report.is_success());
    assert_eq!(report.succeeded(GroupAction::Restarted), 2);

    let new_batch1 = store.get("batch1").unwrap().unwrap();
    assert_ne!(new_batch1.pid, batch1.pid);
    assert_eq!(
        dir_names(fixture.temp.path(), &new_batch1.directories),
        vec!["11e", "11d", "11c"]
    );
    assert!(!control.is_alive(batch1.pid).await);
    assert!(control.is_alive(new_batch1.pid).await);

    // Stop everything; records go away with the processes
    let supervisor = fixture.supervisor();
    for record in store.list().unwrap() {
        supervisor.terminate(&record.name, record.pid).await.unwrap();
    }
    assert!(store.list().unwrap().is_empty());
    assert!(!control.is_alive(new_batch1.pid).await);
}

#[tokio::test]
async fn test_sweep_recovers_from_externally_killed_worker() {
    let fixture = Fixture::new(&["11a"]);
    let control = OsProcessControl::new();

    let report = fixture
        .supervisor()
        .run_pass(&rules(), &fixture.snapshot())
        .await
        .unwrap();
    assert!(report.is_success());

    let store = fixture.store();
    let batch1 = store.get("batch1").unwrap().unwrap();

    // Something outside the supervisor kills the worker
    control.force_kill(batch1.pid).await.unwrap();
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while control.is_alive(batch1.pid).await && std::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let supervisor = fixture.supervisor();
    let pruned = supervisor.sweep().await.unwrap();
    assert!(pruned.contains(&"batch1".to_string()));

    // The next pass starts a replacement
    let report = supervisor.run_pass(&rules(), &fixture.snapshot()).await.unwrap();
    assert!(report.is_success());
    let replacement = store.get("batch1").unwrap().unwrap();
    assert_ne!(replacement.pid, batch1.pid);

    for record in store.list().unwrap() {
        supervisor.terminate(&record.name, record.pid).await.unwrap();
    }
}
