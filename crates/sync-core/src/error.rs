//! Error types for sync-core

/// Result type for sync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating rules or loading configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two rules resolve to the same group name, making instance identity ambiguous
    #[error("Duplicate group name '{name}' - each rule must produce a unique group")]
    DuplicateGroupName { name: String },

    /// A rule carries a sort method the evaluator does not know
    #[error("'{method}' is not a valid sort method on rule '{rule}'")]
    UnknownSortMethod { rule: String, method: String },

    /// A rule's path pattern failed to compile
    #[error("Invalid pattern '{pattern}' on rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        source: glob::PatternError,
    },

    /// A required configuration entry is missing or empty
    #[error("Required config entry '{key}' not specified")]
    MissingConfig { key: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
