//! Core logic for the sync fleet manager
//!
//! This crate is the pure layer: it turns ordered selection rules and a
//! directory snapshot into named sync groups, fingerprints group
//! configurations, and diffs desired groups against recorded worker
//! instances. Nothing here touches processes or persistent state.
//!
//! # Architecture
//!
//! ```text
//!        sync-cli
//!            |
//!     sync-supervisor
//!        |        |
//!  sync-registry  |
//!        |        |
//!        +--sync-core
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod paths;
pub mod reconcile;
pub mod record;
pub mod rules;

pub use config::{CoreSection, Manifest, ShutdownSection};
pub use error::{Error, Result};
pub use fingerprint::ConfigFingerprint;
pub use paths::sanitize_path;
pub use reconcile::{Decision, reconcile};
pub use record::InstanceRecord;
pub use rules::{SelectionRule, SortMethod, SyncGroup, evaluate};
