//! Process supervision for the sync fleet manager
//!
//! Launches replication workers, tracks them through the instance
//! registry, and stops them with a graceful-then-forceful protocol. The
//! safety rule throughout: a process is only ever signalled when its pid
//! is recorded, under the right group, in the current registry snapshot.
//!
//! The [`Supervisor`] is wired from three seams: an
//! [`InstanceStore`](sync_registry::InstanceStore) for the registry, a
//! [`ProcessControl`] for signals and liveness, and a [`CommandPlanner`]
//! that renders each group's worker invocation.

pub mod error;
pub mod launch;
pub mod pass;
pub mod process;
pub mod supervisor;

pub use error::{Result, SupervisorError};
pub use launch::{CommandPlanner, WorkerCommand};
pub use pass::{GroupAction, GroupOutcome, PassReport};
pub use process::{OsProcessControl, ProcessControl};
pub use supervisor::{ShutdownPolicy, Supervisor};
