//! Manifest parsing for the fleet configuration file
//!
//! The manifest is a single TOML document holding the worker binary
//! location, the replication roots, runtime state locations, shutdown
//! timing, and the ordered rule list. Unknown keys are rejected rather
//! than silently carried.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::paths::sanitize_path;
use crate::rules::SelectionRule;

fn default_worker_path() -> String {
    "/usr/bin/unison".to_string()
}

fn default_state_dir() -> String {
    "/var/run/syncctl".to_string()
}

fn default_true() -> bool {
    true
}

/// Core settings: where directories live and which binary replicates them
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreSection {
    /// Root under which sync directories are discovered
    pub local_root: String,
    /// Replica root handed to the worker binary
    pub remote_root: String,
    /// Path to the replication binary
    #[serde(default = "default_worker_path")]
    pub worker_path: String,
    /// Directory holding the instance registry and runtime state
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    /// Create the local root and state dir when missing instead of failing
    #[serde(default = "default_true")]
    pub make_root_directories: bool,
}

fn default_poll_interval_ms() -> u64 {
    300
}

fn default_graceful_attempts() -> u32 {
    20
}

fn default_forced_attempts() -> u32 {
    10
}

/// Shutdown timing knobs
///
/// How long a worker gets to exit after the graceful interrupt, and how
/// long again after the forced kill, expressed as poll attempts.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShutdownSection {
    /// Liveness poll interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Poll attempts after the graceful interrupt
    #[serde(default = "default_graceful_attempts")]
    pub graceful_attempts: u32,
    /// Poll attempts after the forced kill
    #[serde(default = "default_forced_attempts")]
    pub forced_attempts: u32,
}

impl Default for ShutdownSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            graceful_attempts: default_graceful_attempts(),
            forced_attempts: default_forced_attempts(),
        }
    }
}

/// Fleet configuration manifest parsed from the config file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Core settings
    pub core: CoreSection,
    /// Shutdown timing
    #[serde(default)]
    pub shutdown: ShutdownSection,
    /// Ordered selection rules
    #[serde(default)]
    pub rules: Vec<SelectionRule>,
}

impl Manifest {
    /// Parse a manifest from TOML content.
    ///
    /// Configured directory paths are sanitized on the way in, and
    /// required entries are checked so a broken file fails here rather
    /// than at the first process operation.
    pub fn parse(content: &str) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(content)?;

        manifest.core.local_root = sanitize_path(&manifest.core.local_root);
        manifest.core.state_dir = sanitize_path(&manifest.core.state_dir);
        manifest.core.remote_root = manifest.core.remote_root.trim().to_string();
        manifest.core.worker_path = sanitize_path(&manifest.core.worker_path);

        for (key, value) in [
            ("core.local_root", &manifest.core.local_root),
            ("core.remote_root", &manifest.core.remote_root),
            ("core.worker_path", &manifest.core.worker_path),
            ("core.state_dir", &manifest.core.state_dir),
        ] {
            if value.is_empty() {
                return Err(Error::MissingConfig {
                    key: key.to_string(),
                });
            }
        }

        Ok(manifest)
    }

    /// Read and parse a manifest file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}
