//! Error types for inflator-core

use std::path::PathBuf;

/// Result type for inflator-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in inflator-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Overlay directory has no descriptor, or a required file is missing
    #[error("No kustomization.yaml or kustomization.yml found in {path}")]
    NotFound { path: PathBuf },

    /// No remote base is reachable from the overlay
    #[error("Could not resolve a remote base from {path}")]
    UnresolvedReference { path: PathBuf },

    /// A revision was recovered from patches but no source URL was
    #[error("Found revision '{revision}' in {path} but no source URL to pair it with")]
    AmbiguousSource { path: PathBuf, revision: String },

    /// A remote base reference has no `?ref=` qualifier
    #[error("Remote base {url} does not pin a revision (missing ?ref=)")]
    MissingRevision { url: String },

    /// A base reference string is malformed
    #[error("Invalid base reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// External tool exited with a non-zero status
    #[error("{tool} failed (exit code {status}):\n{stderr}")]
    ExternalTool {
        tool: String,
        status: i32,
        stderr: String,
    },

    /// External tool could not be started at all
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Merging the referenced fragments produced nothing
    #[error("No values.yaml data found in referenced ConfigMaps or Secrets")]
    NoData,

    /// The release object is missing from the rendered manifests
    #[error("No HelmRelease named '{name}' found in kustomize output")]
    ReleaseNotFound { name: String },

    /// A ConfigMap manifest has no `values.yaml` key
    #[error("No values.yaml key found in data")]
    MissingValuesKey,

    /// A fragment's raw values text is not valid YAML
    #[error("Invalid values.yaml in {kind} '{name}': {message}")]
    FragmentParse {
        kind: String,
        name: String,
        message: String,
    },

    /// Rendered manifest stream could not be parsed
    #[error("Failed to parse manifests: {message}")]
    Manifest { message: String },

    /// A materialized overlay would be written over a source overlay
    #[error("Destination {path} is a source overlay; choose a different output directory")]
    DestinationIsSource { path: PathBuf },

    /// Configuration file could not be loaded
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from inflator-fs
    #[error(transparent)]
    Fs(#[from] inflator_fs::Error),

    /// Fetch error from inflator-git
    #[error(transparent)]
    Git(#[from] inflator_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
