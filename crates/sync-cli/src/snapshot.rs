//! Filesystem snapshot listing
//!
//! The rule evaluator works on a snapshot, never on the live filesystem;
//! this is the one place the directory tree is read.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// List the immediate subdirectories of the sync root as absolute paths.
///
/// Files and symlinks to files are skipped; only directories can be
/// replication units.
pub fn list_directories(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
    let mut snapshot = BTreeSet::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            snapshot.insert(entry.path());
        }
    }
    Ok(snapshot)
}
