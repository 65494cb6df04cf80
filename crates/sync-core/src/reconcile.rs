//! Reconciliation of desired groups against recorded instances
//!
//! Pure diffing: the reconciler reads records and returns decisions as
//! data. Executing them (and mutating the registry) belongs to the
//! supervisor.

use std::collections::BTreeMap;

use tracing::debug;

use crate::record::InstanceRecord;
use crate::rules::SyncGroup;

/// What to do about one desired group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The recorded worker still matches the desired configuration
    Keep { name: String },
    /// No worker is recorded for this group; one must be launched
    Start { group: SyncGroup },
    /// The recorded worker runs an outdated configuration and must be
    /// stopped before a replacement is launched
    Restart { group: SyncGroup, old_pid: u32 },
}

impl Decision {
    /// The group name this decision is about
    pub fn name(&self) -> &str {
        match self {
            Decision::Keep { name } => name,
            Decision::Start { group } => &group.name,
            Decision::Restart { group, .. } => &group.name,
        }
    }
}

/// Diff desired groups against the recorded instances.
///
/// Additive/corrective only: records with no desired group are ignored
/// here, so a transient filesystem read can never cascade into
/// terminations. Decisions come back in group-name order.
pub fn reconcile(
    desired: &BTreeMap<String, SyncGroup>,
    records: &[InstanceRecord],
) -> Vec<Decision> {
    let recorded: BTreeMap<&str, &InstanceRecord> =
        records.iter().map(|r| (r.name.as_str(), r)).collect();

    let mut decisions = Vec::with_capacity(desired.len());
    for (name, group) in desired {
        let fingerprint = group.fingerprint();
        let decision = match recorded.get(name.as_str()) {
            None => Decision::Start {
                group: group.clone(),
            },
            Some(record) if record.fingerprint == fingerprint => {
                Decision::Keep { name: name.clone() }
            }
            Some(record) => Decision::Restart {
                group: group.clone(),
                old_pid: record.pid,
            },
        };
        debug!(group = %name, ?decision, "reconciled");
        decisions.push(decision);
    }
    decisions
}
