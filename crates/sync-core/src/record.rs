//! Instance records
//!
//! The metadata kept for each running replication worker. Records are
//! created when a worker launches, replaced whole on restart, and deleted
//! only once termination is confirmed.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::ConfigFingerprint;

/// Record of one running replication worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Group name, the registry key
    pub name: String,
    /// Process ID of the worker
    pub pid: u32,
    /// Fingerprint of the configuration the worker was launched with
    pub fingerprint: ConfigFingerprint,
    /// Directories the worker replicates, in priority order
    pub directories: Vec<PathBuf>,
    /// When the worker was launched
    pub started_at: DateTime<Utc>,
}

impl InstanceRecord {
    /// Create a record stamped with the current time
    pub fn new(
        name: impl Into<String>,
        pid: u32,
        fingerprint: ConfigFingerprint,
        directories: Vec<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            pid,
            fingerprint,
            directories,
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trips_through_json() {
        let record = InstanceRecord::new(
            "orders",
            4242,
            ConfigFingerprint::of("orders", &[PathBuf::from("/data/11a")]),
            vec![PathBuf::from("/data/11a")],
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: InstanceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
