//! Configuration resolution with layered merge

use std::fs;
use std::path::{Path, PathBuf};

use inflator_fs::NormalizedPath;

use super::settings::InflatorConfig;
use crate::{Error, Result};

/// Project-level configuration file name.
pub const PROJECT_CONFIG_FILE: &str = ".bb-inflator.toml";

const APP_DIR: &str = "bb-inflator";
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Resolves configuration by merging multiple sources
///
/// Configuration is loaded from a hierarchy of sources:
/// 1. Global defaults (`<config_dir>/bb-inflator/config.toml`)
/// 2. Project config (`./.bb-inflator.toml`)
/// 3. Explicit file (`--config <path>`), which must exist
///
/// Missing global or project files are skipped.
pub struct ConfigResolver {
    /// Directory searched for the project config
    project_dir: NormalizedPath,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,

    /// File named on the command line
    explicit: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(project_dir: NormalizedPath) -> Self {
        Self {
            project_dir,
            global_config_dir_override: None,
            explicit: None,
        }
    }

    /// Use a custom global config directory instead of the platform default.
    pub fn with_global_config_dir(mut self, dir: PathBuf) -> Self {
        self.global_config_dir_override = Some(dir);
        self
    }

    /// Add an explicitly requested config file as the final layer.
    pub fn with_explicit(mut self, file: Option<PathBuf>) -> Self {
        self.explicit = file;
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join(APP_DIR))
    }

    /// Resolve the configuration by merging all layers over the defaults.
    pub fn resolve(&self) -> Result<InflatorConfig> {
        let mut merged = toml::Table::new();

        if let Some(global_dir) = self.global_config_dir() {
            let global_path = global_dir.join(GLOBAL_CONFIG_FILE);
            if global_path.is_file() {
                tracing::debug!(?global_path, "Loading global config");
                merge_tables(&mut merged, load_table(&global_path)?);
            }
        }

        let project_path = self.project_dir.join(PROJECT_CONFIG_FILE).to_native();
        if project_path.is_file() {
            tracing::debug!(?project_path, "Loading project config");
            merge_tables(&mut merged, load_table(&project_path)?);
        }

        if let Some(explicit) = &self.explicit {
            if !explicit.is_file() {
                return Err(Error::Config {
                    path: explicit.clone(),
                    message: "file does not exist".to_string(),
                });
            }
            tracing::debug!(?explicit, "Loading explicit config");
            merge_tables(&mut merged, load_table(explicit)?);
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| Error::Config {
                path: self.project_dir.to_native(),
                message: e.to_string(),
            })
    }
}

fn load_table(path: &Path) -> Result<toml::Table> {
    let content = fs::read_to_string(path).map_err(|e| inflator_fs::Error::io(path, e))?;
    content.parse::<toml::Table>().map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Merge `overlay` into `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
