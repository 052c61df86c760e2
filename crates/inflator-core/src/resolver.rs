//! Base resolution across a chain of local overlays
//!
//! Overlays typically stack several directories deep before reaching the one
//! that points at the upstream chart repository. The resolver walks that
//! graph depth-first in declared order and returns the first remote reference
//! it meets.

use std::collections::HashSet;

use inflator_fs::NormalizedPath;

use crate::descriptor::Descriptor;
use crate::reference::{BaseReference, RemoteReference};
use crate::{Error, Result};

const GIT_REPOSITORY_MARKER: &str = "kind: GitRepository";
const TAG_FIELD: &str = "tag:";

/// Finds the remote source an overlay ultimately builds on.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseResolver;

impl BaseResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the remote base of the overlay at `dir`.
    ///
    /// `dir` is made absolute and seeded into the visited set, so a base that
    /// points back at the starting overlay is treated as a cycle.
    pub fn resolve(&self, dir: &NormalizedPath) -> Result<RemoteReference> {
        let start = NormalizedPath::absolute(dir)?;
        let mut visited = HashSet::from([start.clone()]);
        self.resolve_with(&start, &mut visited)
    }

    /// Resolve with an explicit visited set.
    ///
    /// Local bases already in `visited` are skipped; every other local base is
    /// added before it is descended into. A failure inside one local base
    /// does not stop the search through its siblings, and neither does a
    /// malformed base string.
    pub fn resolve_with(
        &self,
        dir: &NormalizedPath,
        visited: &mut HashSet<NormalizedPath>,
    ) -> Result<RemoteReference> {
        let descriptor = Descriptor::load(dir)?;

        for base in descriptor.bases() {
            tracing::debug!(dir = %dir, base = %base, "Checking base");

            match BaseReference::parse(&base) {
                Err(e) => {
                    tracing::warn!(dir = %dir, base = %base, error = %e, "Skipping malformed base");
                    continue;
                }
                Ok(BaseReference::Remote(remote)) => {
                    tracing::debug!(
                        url = %remote.url,
                        revision = ?remote.revision,
                        subdir = %remote.subdir,
                        "Found remote base"
                    );
                    return Ok(remote);
                }
                Ok(BaseReference::Local(local)) => {
                    let local_dir = dir.join(&local.path);
                    if !visited.insert(local_dir.clone()) {
                        tracing::warn!(path = %local_dir, "Circular base reference detected");
                        continue;
                    }

                    tracing::debug!(path = %local_dir, "Recursing into local base");
                    match self.resolve_with(&local_dir, visited) {
                        Ok(remote) => return Ok(remote),
                        Err(e) => {
                            tracing::debug!(path = %local_dir, error = %e, "Local base did not resolve");
                        }
                    }
                }
            }
        }

        match revision_from_patches(&descriptor) {
            Some(revision) => Err(Error::AmbiguousSource {
                path: dir.to_native(),
                revision,
            }),
            None => Err(Error::UnresolvedReference {
                path: dir.to_native(),
            }),
        }
    }
}

/// Recover a revision from an inline `GitRepository` patch.
///
/// Scans every patch that mentions `kind: GitRepository` for `tag:` lines;
/// the last one found wins. Only the revision can be recovered this way.
pub fn revision_from_patches(descriptor: &Descriptor) -> Option<String> {
    let mut revision = None;

    for patch in descriptor.patches_strategic_merge() {
        if !patch.contains(GIT_REPOSITORY_MARKER) {
            continue;
        }
        for line in patch.lines() {
            if let Some((_, tag)) = line.split_once(TAG_FIELD) {
                let tag = tag.trim().trim_matches('"').to_string();
                tracing::debug!(tag = %tag, "Found revision in patch");
                revision = Some(tag);
            }
        }
    }

    revision
}
