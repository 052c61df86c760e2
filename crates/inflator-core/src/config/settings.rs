//! Configuration schema

use serde::{Deserialize, Serialize};

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflatorConfig {
    /// `metadata.name` of the HelmRelease whose `valuesFrom` drives merging,
    /// also used as the release name for `helm template`
    pub release_name: String,

    /// Directory name the upstream base is cloned into when materializing
    pub clone_dir_name: String,

    /// Collaborator binaries
    pub tools: ToolsConfig,
}

impl Default for InflatorConfig {
    fn default() -> Self {
        Self {
            release_name: "bigbang".to_string(),
            clone_dir_name: "cloned-bigbang-base".to_string(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Program names or paths of the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub kustomize: String,
    pub helm: String,
    pub sops: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            kustomize: "kustomize".to_string(),
            helm: "helm".to_string(),
            sops: "sops".to_string(),
        }
    }
}
