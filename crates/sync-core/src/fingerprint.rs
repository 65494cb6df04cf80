//! Configuration fingerprints for change detection
//!
//! A fingerprint is an opaque equality token over a group's identity: its
//! name and its ordered directory list. Reordering or changing the set
//! produces a different fingerprint.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::rules::SyncGroup;

/// Collision-resistant digest of a group's identity-relevant configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigFingerprint(String);

impl ConfigFingerprint {
    /// Compute the fingerprint of a named directory list.
    ///
    /// Fields are NUL-separated before hashing so that the encoding is
    /// injective: no two distinct (name, directories) inputs collapse to
    /// the same byte stream.
    pub fn of(name: &str, directories: &[PathBuf]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        for dir in directories {
            hasher.update(dir.to_string_lossy().as_bytes());
            hasher.update([0u8]);
        }
        Self(format!("sha256:{:x}", hasher.finalize()))
    }

    /// The `sha256:<hex>` digest string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SyncGroup {
    /// Fingerprint of this group's name and ordered directory list
    pub fn fingerprint(&self) -> ConfigFingerprint {
        ConfigFingerprint::of(&self.name, &self.directories)
    }
}
