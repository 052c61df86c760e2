//! Per-invocation state shared by all commands

use std::path::{Path, PathBuf};

use inflator_core::{ConfigResolver, Inflator};
use inflator_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Resolved configuration and the inflator built from it.
pub struct Context {
    pub cwd: NormalizedPath,
    pub inflator: Inflator,
}

impl Context {
    /// Resolve configuration relative to the current directory.
    pub fn load(explicit_config: Option<PathBuf>) -> Result<Self> {
        let cwd = NormalizedPath::new(std::env::current_dir()?);
        let config = ConfigResolver::new(cwd.clone())
            .with_explicit(explicit_config)
            .resolve()?;
        tracing::debug!(?config, "Resolved configuration");

        Ok(Self {
            cwd,
            inflator: Inflator::system(config),
        })
    }

    /// Validate that `path` names an existing directory.
    pub fn overlay_dir(&self, path: &Path) -> Result<NormalizedPath> {
        if !path.is_dir() {
            return Err(CliError::user(format!(
                "Directory '{}' does not exist",
                path.display()
            )));
        }
        Ok(NormalizedPath::new(path))
    }
}
