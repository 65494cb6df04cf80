//! The reconciliation pass
//!
//! One pass evaluates the rules, diffs the result against the registry,
//! and executes the decisions. Each group's launch or restart runs as its
//! own task so a slow-to-die worker in one group never delays the others;
//! results are joined into a single report.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tokio::task::JoinSet;
use tracing::{error, info};

use sync_core::{Decision, SelectionRule, evaluate, reconcile};

use crate::error::{Result, SupervisorError};
use crate::supervisor::Supervisor;

/// What a pass did about one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    /// Recorded worker still matched; nothing was done
    Kept,
    /// A new worker was launched
    Started,
    /// The outdated worker was stopped and a replacement launched
    Restarted,
}

/// Per-group outcome of a reconciliation pass
#[derive(Debug)]
pub struct GroupOutcome {
    /// Group name
    pub name: String,
    /// Action the pass attempted for this group
    pub action: GroupAction,
    /// Success, or the typed failure for this group alone
    pub result: std::result::Result<(), SupervisorError>,
}

/// Joined result of one reconciliation pass, one entry per desired group
#[derive(Debug, Default)]
pub struct PassReport {
    /// Outcomes in group-name order
    pub outcomes: Vec<GroupOutcome>,
}

impl PassReport {
    /// True when every group succeeded
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Count of outcomes with the given action that succeeded
    pub fn succeeded(&self, action: GroupAction) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action == action && o.result.is_ok())
            .count()
    }
}

impl Supervisor {
    /// Run one reconciliation pass over the rule set and snapshot.
    ///
    /// Configuration errors (duplicate names, unknown sort methods) abort
    /// the pass before any process is touched. Per-group launch and
    /// termination failures are collected in the report and never affect
    /// sibling groups. A pass over an unchanged rule set, snapshot, and
    /// registry keeps every group and touches nothing.
    pub async fn run_pass(
        &self,
        rules: &[SelectionRule],
        snapshot: &BTreeSet<PathBuf>,
    ) -> Result<PassReport> {
        let desired = evaluate(rules, snapshot)?;
        let records = self.store().list()?;
        let decisions = reconcile(&desired, &records);

        info!(
            groups = desired.len(),
            recorded = records.len(),
            "reconciliation pass"
        );

        let mut outcomes = Vec::with_capacity(decisions.len());
        let mut tasks: JoinSet<GroupOutcome> = JoinSet::new();

        for decision in decisions {
            match decision {
                Decision::Keep { name } => outcomes.push(GroupOutcome {
                    name,
                    action: GroupAction::Kept,
                    result: Ok(()),
                }),
                Decision::Start { group } => {
                    let supervisor = self.clone();
                    tasks.spawn(async move {
                        let name = group.name.clone();
                        let result = supervisor.launch(&group).await.map(|_| ());
                        GroupOutcome {
                            name,
                            action: GroupAction::Started,
                            result,
                        }
                    });
                }
                Decision::Restart { group, old_pid } => {
                    let supervisor = self.clone();
                    tasks.spawn(async move {
                        let name = group.name.clone();
                        let result: std::result::Result<(), SupervisorError> = async {
                            supervisor.terminate(&name, old_pid).await?;
                            supervisor.launch(&group).await?;
                            Ok(())
                        }
                        .await;
                        GroupOutcome {
                            name,
                            action: GroupAction::Restarted,
                            result,
                        }
                    });
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_error) => {
                    // A panicked task loses its group context; surface it
                    // in the log and keep reporting the rest
                    error!(%join_error, "group task aborted");
                }
            }
        }

        outcomes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(PassReport { outcomes })
    }
}
