//! Clone-and-checkout of remote sources

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{Object, Repository};
use inflator_fs::NormalizedPath;

use crate::{Error, Result};

/// Capability to materialize a remote source at a revision on local disk.
pub trait SourceFetcher {
    /// Clone `url` into `dest` and check out `revision`.
    ///
    /// `dest` must not exist or must be an empty directory.
    fn fetch(&self, url: &str, revision: &str, dest: &NormalizedPath) -> Result<()>;
}

/// [`SourceFetcher`] backed by libgit2.
///
/// Credentials come from whatever libgit2 picks up by default, so only
/// anonymous remotes and local paths work out of the box.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl SourceFetcher for GitFetcher {
    fn fetch(&self, url: &str, revision: &str, dest: &NormalizedPath) -> Result<()> {
        tracing::debug!(url, revision, dest = %dest, "Cloning remote source");

        let repo = RepoBuilder::new()
            .clone(url, &dest.to_native())
            .map_err(|e| Error::FetchFailed {
                url: url.to_string(),
                message: e.message().to_string(),
            })?;

        checkout_revision(&repo, revision).map_err(|e| match e {
            Error::RevisionNotFound { revision, .. } => Error::RevisionNotFound {
                url: url.to_string(),
                revision,
            },
            other => other,
        })
    }
}

/// Check out `revision` in `repo` with a detached HEAD.
///
/// The revision may name a commit, a tag, a local branch, or a branch that
/// only exists on `origin`, mirroring what `git checkout <rev>` accepts.
pub fn checkout_revision(repo: &Repository, revision: &str) -> Result<()> {
    let object = resolve_revision(repo, revision)?;
    let commit = object.peel_to_commit()?;

    let mut opts = CheckoutBuilder::new();
    opts.force();
    repo.checkout_tree(commit.as_object(), Some(&mut opts))?;
    repo.set_head_detached(commit.id())?;

    tracing::debug!(revision, commit = %commit.id(), "Checked out revision");
    Ok(())
}

fn resolve_revision<'r>(repo: &'r Repository, revision: &str) -> Result<Object<'r>> {
    let candidates = [
        revision.to_string(),
        format!("origin/{revision}"),
        format!("refs/tags/{revision}"),
    ];

    candidates
        .iter()
        .find_map(|spec| repo.revparse_single(spec).ok())
        .ok_or_else(|| Error::RevisionNotFound {
            url: repo
                .find_remote("origin")
                .ok()
                .and_then(|r| r.url().map(str::to_string))
                .unwrap_or_default(),
            revision: revision.to_string(),
        })
}
