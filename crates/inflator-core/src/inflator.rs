//! High-level operations behind each command
//!
//! [`Inflator`] wires the resolver, collectors, merge engine, and
//! materializer to the external collaborators. Each public method is one
//! end-to-end operation.

use std::io::Write;

use serde_yaml::Value;

use inflator_fs::{NormalizedPath, io};
use inflator_git::{GitFetcher, SourceFetcher};

use crate::collector::{collect_encrypted, collect_plain, decrypt_fragments, secret_values};
use crate::config::InflatorConfig;
use crate::manifest::{self, parse_documents};
use crate::materialize::LocalMaterializer;
use crate::reference::RemoteReference;
use crate::release::ReferenceOrder;
use crate::resolver::BaseResolver;
use crate::runner::{CommandRunner, SystemRunner};
use crate::tools::ExternalTools;
use crate::values::ValuesMergeEngine;
use crate::{Error, Result};

const CLONE_PREFIX: &str = "bb-inflator-";
const VALUES_SUFFIX: &str = ".yaml";

/// Entry point for every inflator operation.
#[derive(Debug)]
pub struct Inflator<R = SystemRunner, F = GitFetcher> {
    runner: R,
    fetcher: F,
    config: InflatorConfig,
    tools: ExternalTools,
}

impl Inflator {
    /// Inflator using real processes and libgit2.
    pub fn system(config: InflatorConfig) -> Self {
        Self::new(SystemRunner::new(), GitFetcher::new(), config)
    }
}

impl<R: CommandRunner, F: SourceFetcher> Inflator<R, F> {
    pub fn new(runner: R, fetcher: F, config: InflatorConfig) -> Self {
        let tools = ExternalTools::new(config.tools.clone());
        Self {
            runner,
            fetcher,
            config,
            tools,
        }
    }

    pub fn config(&self) -> &InflatorConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Values document of a single ConfigMap manifest.
    pub fn extract_values(&self, manifest: &str) -> Result<Value> {
        manifest::extract_values(manifest)
    }

    /// Remote base the overlay at `dir` builds on.
    pub fn resolve_base(&self, dir: &NormalizedPath) -> Result<RemoteReference> {
        BaseResolver::new().resolve(dir)
    }

    /// Clone `url` at `revision` and render `subdir` with kustomize.
    pub fn inflate(&self, url: &str, revision: &str, subdir: &str) -> Result<String> {
        let clone = self.clone_source(url, revision)?;
        let root = NormalizedPath::new(clone.path());
        let target = if subdir.is_empty() { root } else { root.join(subdir) };

        tracing::info!(dir = %target, "Running kustomize build");
        self.tools.build(&self.runner, &target)
    }

    /// Resolve the overlay's remote base and render it.
    pub fn inflate_from_overlay(&self, dir: &NormalizedPath) -> Result<String> {
        let remote = self.resolve_base(dir)?;
        let revision = remote.require_revision()?;
        tracing::info!(url = %remote.url, revision, subdir = %remote.subdir, "Resolved remote base");
        self.inflate(&remote.url, revision, &remote.subdir)
    }

    /// Merged values of the overlay at `dir`, in the release's declared order.
    pub fn overlay_values(&self, dir: &NormalizedPath) -> Result<Value> {
        let rendered = self.tools.build(&self.runner, dir)?;
        let docs = parse_documents(&rendered)?;
        tracing::debug!(documents = docs.len(), "Parsed kustomize output");

        let plain = collect_plain(&docs);
        let files = collect_encrypted(dir)?;
        let encrypted = decrypt_fragments(&self.runner, &self.tools, &files);

        let order = ReferenceOrder::from_documents(&docs, &self.config.release_name)?;
        ValuesMergeEngine::new().merge(&order, &plain, &encrypted)
    }

    /// Every decrypted Secret values fragment reachable from `dir`.
    ///
    /// Fails with [`Error::NoData`] when none could be decrypted.
    pub fn secret_values(&self, dir: &NormalizedPath) -> Result<Vec<(String, String)>> {
        let files = collect_encrypted(dir)?;
        let fragments = secret_values(&self.runner, &self.tools, &files);
        if fragments.is_empty() {
            return Err(Error::NoData);
        }
        Ok(fragments)
    }

    /// Render the overlay's upstream chart with `values`.
    ///
    /// `values` is stripped of non-printable characters before it is handed
    /// to helm.
    pub fn template_with_values(&self, dir: &NormalizedPath, values: &str) -> Result<String> {
        let values = manifest::sanitize(values);

        let remote = self.resolve_base(dir)?;
        let revision = remote.require_revision()?;
        let clone = self.clone_source(&remote.url, revision)?;
        let root = NormalizedPath::new(clone.path());
        let chart = if remote.subdir.is_empty() {
            root
        } else {
            root.join(&remote.subdir)
        };
        tracing::debug!(chart = %chart, "Chart path for helm template");

        let mut values_file = tempfile::Builder::new()
            .prefix(CLONE_PREFIX)
            .suffix(VALUES_SUFFIX)
            .tempfile()?;
        values_file.write_all(values.as_bytes())?;
        values_file.flush()?;

        tracing::info!(release = %self.config.release_name, "Running helm template");
        self.tools.template(
            &self.runner,
            &self.config.release_name,
            &chart,
            values_file.path(),
        )
    }

    /// Mirror the overlay onto `dest` with its remote base cloned alongside,
    /// then render the local copy.
    ///
    /// The clone lands in `dest/<clone_dir_name>`; an existing clone there is
    /// replaced. `dest` must lie outside the overlay directory.
    pub fn build_with_local_base(&self, dir: &NormalizedPath, dest: &NormalizedPath) -> Result<String> {
        let remote = self.resolve_base(dir)?;
        let revision = remote.require_revision()?;

        let root_src = NormalizedPath::absolute(dir)?;
        let root_dest = NormalizedPath::absolute(dest)?;
        let clone_dir = root_dest.join(&self.config.clone_dir_name);
        let remote_local_path = if remote.subdir.is_empty() {
            clone_dir.clone()
        } else {
            clone_dir.join(&remote.subdir)
        };
        let materializer = LocalMaterializer::new(remote_local_path, root_src.clone(), root_dest.clone());
        materializer.check_destination()?;

        io::remove_dir_if_exists(&clone_dir)?;
        tracing::info!(url = %remote.url, revision, dest = %clone_dir, "Cloning remote base");
        self.fetcher.fetch(&remote.url, revision, &clone_dir)?;

        materializer.materialize(&root_src, &root_dest)?;

        tracing::info!(dir = %root_dest, "Running kustomize build");
        self.tools.build(&self.runner, &root_dest)
    }

    /// Fetch `url` at `revision` into a fresh temporary directory.
    fn clone_source(&self, url: &str, revision: &str) -> Result<tempfile::TempDir> {
        let clone = tempfile::Builder::new().prefix(CLONE_PREFIX).tempdir()?;
        tracing::info!(url, revision, "Cloning");
        self.fetcher
            .fetch(url, revision, &NormalizedPath::new(clone.path()))?;
        Ok(clone)
    }
}
