//! CLI error type

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the operator
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Operator-facing message with no underlying cause worth chaining
    #[error("{0}")]
    User(String),

    /// Configuration or rule evaluation failure
    #[error(transparent)]
    Config(#[from] sync_core::Error),

    /// Registry failure
    #[error(transparent)]
    Registry(#[from] sync_registry::Error),

    /// Supervision failure
    #[error(transparent)]
    Supervisor(#[from] sync_supervisor::SupervisorError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Build a plain user-facing error
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}
