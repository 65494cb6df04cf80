//! Selection rules and the group evaluator
//!
//! Rules partition a flat snapshot of directories into named sync groups.
//! Rules run in order; each rule can only claim directories not already
//! claimed by an earlier rule, unless it opts into overlap.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Sort order applied to a rule's matched directories
///
/// Ordering is part of a group's identity: it determines replication
/// priority, not just display. Lexicographic only; numeric-aware ordering
/// would be a new explicit variant, never a silent change to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    /// Lexicographic ascending (lowest name first)
    NameAsc,
    /// Lexicographic descending (highest name first)
    NameDesc,
}

impl SortMethod {
    /// Resolve a configured sort method string.
    ///
    /// Accepts the canonical spellings plus the legacy `name_lowfirst` /
    /// `name_highfirst` aliases. Returns `None` for anything else so the
    /// caller can report which rule carried the bad value.
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "name_asc" | "name_lowfirst" => Some(Self::NameAsc),
            "name_desc" | "name_highfirst" => Some(Self::NameDesc),
            _ => None,
        }
    }
}

fn default_sort_method() -> String {
    "name_asc".to_string()
}

/// One ordered directory-selection rule
///
/// Immutable once loaded. The `sort_method` stays a raw string here and is
/// resolved during evaluation, so an unknown method is reported against the
/// rule that carries it rather than failing the whole file anonymously.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionRule {
    /// Group name this rule produces. May be empty, in which case the
    /// evaluator derives a unique key from the rule's position.
    #[serde(default)]
    pub name: String,
    /// Shell-style glob matched against directory names (no recursion)
    pub pattern: String,
    /// Sort method name, resolved via [`SortMethod::parse`]
    #[serde(default = "default_sort_method")]
    pub sort_method: String,
    /// Keep at most this many directories after sorting and skipping
    #[serde(default)]
    pub take: Option<usize>,
    /// Drop this many directories from the front after sorting
    #[serde(default)]
    pub skip: Option<usize>,
    /// When true, this rule ignores directories claimed by earlier rules
    /// and its selections are not withheld from later rules
    #[serde(default)]
    pub allow_overlap: bool,
}

impl SelectionRule {
    /// The group key this rule produces: its name, or a positional key for
    /// unnamed rules so downstream group names stay unique.
    pub fn group_key(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("rule-{}", index)
        } else {
            self.name.clone()
        }
    }
}

/// A named, ordered set of directories assigned to one replication worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncGroup {
    /// Group name, unique across the evaluated rule set
    pub name: String,
    /// Directories in rule-sort order (order is priority)
    pub directories: Vec<PathBuf>,
}

/// Evaluate an ordered rule list against a directory snapshot.
///
/// Pure function: the snapshot is the only view of the filesystem. Rules
/// claim directories in order; a directory claimed by a non-overlap rule is
/// invisible to later non-overlap rules. Rules matching nothing produce no
/// group.
///
/// # Errors
///
/// Fails before producing any group when two rules share a non-empty name,
/// and fails at the offending rule for an unknown sort method or an invalid
/// pattern.
pub fn evaluate(
    rules: &[SelectionRule],
    snapshot: &BTreeSet<PathBuf>,
) -> Result<BTreeMap<String, SyncGroup>> {
    // Reject ambiguous instance identity up front, before any rule runs
    let mut names = HashSet::new();
    for rule in rules {
        if !rule.name.is_empty() && !names.insert(rule.name.as_str()) {
            return Err(Error::DuplicateGroupName {
                name: rule.name.clone(),
            });
        }
    }

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut result: BTreeMap<String, SyncGroup> = BTreeMap::new();

    for (index, rule) in rules.iter().enumerate() {
        let key = rule.group_key(index);

        let sort = SortMethod::parse(&rule.sort_method).ok_or_else(|| {
            Error::UnknownSortMethod {
                rule: key.clone(),
                method: rule.sort_method.clone(),
            }
        })?;

        let pattern = Pattern::new(&rule.pattern).map_err(|source| Error::InvalidPattern {
            rule: key.clone(),
            pattern: rule.pattern.clone(),
            source,
        })?;

        let mut candidates: Vec<&PathBuf> = snapshot
            .iter()
            .filter(|path| matches_directory(&pattern, path))
            .collect();

        if !rule.allow_overlap {
            let before = candidates.len();
            candidates.retain(|path| !claimed.contains(*path));
            if candidates.len() != before {
                debug!(
                    rule = %key,
                    before,
                    after = candidates.len(),
                    "removed already-claimed directories"
                );
            }
        }

        match sort {
            SortMethod::NameAsc => candidates.sort(),
            SortMethod::NameDesc => {
                candidates.sort();
                candidates.reverse();
            }
        }

        let selected: Vec<PathBuf> = candidates
            .into_iter()
            .skip(rule.skip.unwrap_or(0))
            .take(rule.take.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        if selected.is_empty() {
            continue;
        }

        if !rule.allow_overlap {
            claimed.extend(selected.iter().cloned());
        }

        debug!(rule = %key, directories = selected.len(), "rule selected directories");

        if result
            .insert(
                key.clone(),
                SyncGroup {
                    name: key.clone(),
                    directories: selected,
                },
            )
            .is_some()
        {
            return Err(Error::DuplicateGroupName { name: key });
        }
    }

    Ok(result)
}

/// Match a pattern against the path's final component.
///
/// Selectors address one directory level under the sync root, so only the
/// directory's own name participates; `*` never crosses a separator.
fn matches_directory(pattern: &Pattern, path: &PathBuf) -> bool {
    path.file_name()
        .map(|name| pattern.matches(&name.to_string_lossy()))
        .unwrap_or(false)
}
