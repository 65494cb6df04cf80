//! Error types for supervision operations

use std::process::ExitStatus;

/// Result type for supervisor operations
pub type Result<T> = std::result::Result<T, SupervisorError>;

/// Errors that can occur while launching or terminating workers
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The worker process could not be spawned
    #[error("Failed to launch worker for '{name}': {source}")]
    Launch {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The worker exited within the startup grace window
    #[error("Worker for '{name}' exited during startup ({status})")]
    ExitedEarly { name: String, status: ExitStatus },

    /// Signal delivery to an existing pid failed
    #[error("Failed to signal pid {pid} of '{name}': {source}")]
    Signal {
        name: String,
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    /// The pid is not recorded for this group; the supervisor refuses to
    /// touch processes it does not own
    #[error("Pid {pid} is not tracked for '{name}' - refusing to signal")]
    NotTracked { name: String, pid: u32 },

    /// The worker outlived both the graceful and the forced shutdown
    /// budget; its record is retained for a later retry
    #[error("Worker '{name}' (pid {pid}) is still alive after forced shutdown")]
    TerminationTimeout { name: String, pid: u32 },

    /// Registry failure
    #[error(transparent)]
    Registry(#[from] sync_registry::Error),

    /// Rule evaluation or configuration failure
    #[error(transparent)]
    Config(#[from] sync_core::Error),
}
