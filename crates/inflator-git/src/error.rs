//! Error types for inflator-git

/// Result type for inflator-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in inflator-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] inflator_fs::Error),

    #[error("Failed to clone {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Revision '{revision}' not found in {url}")]
    RevisionNotFound { url: String, revision: String },
}
