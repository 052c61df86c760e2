//! Wrappers around the collaborator binaries

use std::path::Path;

use inflator_fs::NormalizedPath;

use crate::config::ToolsConfig;
use crate::runner::{CommandRunner, ToolCommand};
use crate::Result;

/// `kustomize`, `sops`, and `helm`, invoked by configured program name.
#[derive(Debug, Clone, Default)]
pub struct ExternalTools {
    config: ToolsConfig,
}

impl ExternalTools {
    pub fn new(config: ToolsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    /// `kustomize build <dir>`, returning the rendered manifest stream.
    pub fn build(&self, runner: &dyn CommandRunner, dir: &NormalizedPath) -> Result<String> {
        let command = ToolCommand::new(&self.config.kustomize)
            .arg("build")
            .path_arg(&dir.to_native());
        tracing::debug!(dir = %dir, "Running kustomize build");
        runner.run(&command)?.into_stdout(&self.config.kustomize)
    }

    /// `sops -d <file>`, run from the file's directory so relative
    /// `.sops.yaml` rules apply.
    pub fn decrypt(&self, runner: &dyn CommandRunner, file: &Path) -> Result<String> {
        let mut command = ToolCommand::new(&self.config.sops).arg("-d").path_arg(file);
        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            command = command.current_dir(parent);
        }
        runner.run(&command)?.into_stdout(&self.config.sops)
    }

    /// `helm template <release> <chart> -f <values_file>`.
    pub fn template(
        &self,
        runner: &dyn CommandRunner,
        release: &str,
        chart: &NormalizedPath,
        values_file: &Path,
    ) -> Result<String> {
        let command = ToolCommand::new(&self.config.helm)
            .arg("template")
            .arg(release)
            .path_arg(&chart.to_native())
            .arg("-f")
            .path_arg(values_file);
        tracing::debug!(release, chart = %chart, "Running helm template");
        runner.run(&command)?.into_stdout(&self.config.helm)
    }
}
