//! Error types for envr-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from envr-core
    #[error(transparent)]
    Core(#[from] envr_core::Error),

    /// Malformed path or type
    #[error(transparent)]
    Types(#[from] envr_types::Error),

    /// The resolved value could not be supplied
    #[error(transparent)]
    Value(#[from] envr_core::ValueError),

    /// JSON output failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
