//! Error types for inflator-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from inflator-core
    #[error(transparent)]
    Core(#[from] inflator_core::Error),

    /// Error from inflator-fs
    #[error(transparent)]
    Fs(#[from] inflator_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
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

    /// Process exit code for this error.
    ///
    /// A failing collaborator's own exit status is passed through.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(inflator_core::Error::ExternalTool { status, .. }) if *status > 0 => *status,
            _ => 1,
        }
    }
}
