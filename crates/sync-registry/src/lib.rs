//! Persistent instance registry for the sync fleet manager
//!
//! Tracks which replication worker runs for which group: a typed record
//! store keyed by group name, with atomic get/put/remove/list operations.
//! The file-backed store persists across supervisor restarts; the
//! in-memory store backs tests.

pub mod error;
pub mod store;

pub use error::{Error, Result};
pub use store::{FileStore, InstanceStore, MemoryStore};
