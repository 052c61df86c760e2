//! Local materialization of an overlay graph
//!
//! Mirrors an overlay and every local base it reaches onto a new root,
//! rewriting remote bases to point at an already-fetched local copy. The
//! result builds with kustomize without network access.

use std::collections::HashSet;
use std::fs;

use inflator_fs::{NormalizedPath, OverlayPath, copy_tree};

use crate::descriptor::Descriptor;
use crate::reference::BaseReference;
use crate::{Error, Result};

#[derive(Debug)]
struct PlannedOverlay {
    src: NormalizedPath,
    dest: NormalizedPath,
    descriptor: Descriptor,
}

/// Copies overlays from `root_src` to `root_dest`.
#[derive(Debug, Clone)]
pub struct LocalMaterializer {
    remote_local_path: NormalizedPath,
    root_src: NormalizedPath,
    root_dest: NormalizedPath,
}

impl LocalMaterializer {
    /// `remote_local_path` replaces every remote base in the tree. Local bases
    /// land at their path relative to `root_src`, re-rooted under `root_dest`.
    pub fn new(
        remote_local_path: NormalizedPath,
        root_src: NormalizedPath,
        root_dest: NormalizedPath,
    ) -> Self {
        Self {
            remote_local_path,
            root_src,
            root_dest,
        }
    }

    /// Materialize the overlay at `src` into `dest`, then every local base
    /// it reaches.
    ///
    /// A local base is written to its path under `root_src` re-rooted under
    /// `root_dest`, but the rewritten reference is relative to the
    /// destination of the overlay that names it, not to `root_src`. Nested
    /// bases therefore resolve from wherever their parent was written.
    ///
    /// All files are copied before any rewritten descriptor is written, so a
    /// base nested inside another overlay's directory keeps its rewrite.
    /// Fails with [`Error::DestinationIsSource`] before touching anything
    /// when a rewritten descriptor would land in a source overlay or anywhere
    /// under `root_src`.
    pub fn materialize(&self, src: &NormalizedPath, dest: &NormalizedPath) -> Result<()> {
        self.check_destination()?;
        let src = NormalizedPath::absolute(src)?;
        let dest = NormalizedPath::absolute(dest)?;

        let mut visited = HashSet::new();
        let mut pending = Vec::new();
        self.plan(&src, &dest, &mut visited, &mut pending)?;

        if let Some(overlay) = pending
            .iter()
            .find(|o| visited.contains(&o.dest) || self.within_source(&o.dest))
        {
            return Err(Error::DestinationIsSource {
                path: overlay.dest.to_native(),
            });
        }

        for overlay in &pending {
            tracing::debug!(src = %overlay.src, dest = %overlay.dest, "Materializing overlay");
            let dest = overlay.dest.to_native();
            fs::create_dir_all(&dest).map_err(|e| inflator_fs::Error::io(&dest, e))?;
            self.copy_contents(&overlay.src, &overlay.dest)?;
        }

        for overlay in pending {
            let alt = overlay.dest.join(OverlayPath::DescriptorAlt.as_str());
            if alt.is_file() {
                fs::remove_file(alt.to_native()).map_err(|e| inflator_fs::Error::io(alt.to_native(), e))?;
            }
            let written = overlay.descriptor.write_to(&overlay.dest)?;
            tracing::debug!(file = %written, "Wrote rewritten descriptor");
        }
        Ok(())
    }

    /// Load every reachable overlay and rewrite its bases without writing.
    fn plan(
        &self,
        src: &NormalizedPath,
        dest: &NormalizedPath,
        visited: &mut HashSet<NormalizedPath>,
        pending: &mut Vec<PlannedOverlay>,
    ) -> Result<()> {
        visited.insert(src.clone());
        let mut descriptor = Descriptor::load(src)?;

        let mut rewritten = Vec::new();
        for base in descriptor.bases() {
            match BaseReference::parse(&base)? {
                BaseReference::Remote(remote) => {
                    tracing::debug!(url = %remote.url, local = %self.remote_local_path, "Rewriting remote base");
                    rewritten.push(self.remote_local_path.as_str().to_string());
                }
                BaseReference::Local(local) => {
                    let abs = src.join(&local.path);
                    let target = self.root_dest.join(&abs.relative_to(&self.root_src));

                    if visited.contains(&abs) {
                        tracing::debug!(path = %abs, "Base already materialized");
                    } else {
                        self.plan(&abs, &target, visited, pending)?;
                    }
                    rewritten.push(target.relative_to(dest));
                }
            }
        }

        descriptor.set_bases(rewritten);
        pending.push(PlannedOverlay {
            src: src.clone(),
            dest: dest.clone(),
            descriptor,
        });
        Ok(())
    }

    /// Fail with [`Error::DestinationIsSource`] when `root_dest` is `root_src`
    /// or lies inside it.
    pub fn check_destination(&self) -> Result<()> {
        if self.within_source(&self.root_dest) {
            return Err(Error::DestinationIsSource {
                path: self.root_dest.to_native(),
            });
        }
        Ok(())
    }

    fn within_source(&self, path: &NormalizedPath) -> bool {
        let rel = path.relative_to(&self.root_src);
        rel != ".." && !rel.starts_with("../")
    }

    /// Copy everything but the descriptor from `src` into `dest`.
    fn copy_contents(&self, src: &NormalizedPath, dest: &NormalizedPath) -> Result<()> {
        let src_native = src.to_native();
        let dest_native = dest.to_native();
        let root_dest_native = self.root_dest.to_native();

        let entries = fs::read_dir(&src_native).map_err(|e| inflator_fs::Error::io(&src_native, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| inflator_fs::Error::io(&src_native, e))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let target = dest_native.join(&name);

            if path == dest_native || path == root_dest_native {
                continue;
            }

            if path.is_dir() {
                if OverlayPath::is_excluded_dir(&name) {
                    continue;
                }
                copy_tree(&path, &target)?;
            } else {
                if OverlayPath::is_descriptor_name(&name) {
                    continue;
                }
                fs::copy(&path, &target).map_err(|e| inflator_fs::Error::io(&path, e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inflator_test_utils::OverlayTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_overlay_rewrite() {
        let src = OverlayTree::new();
        src.overlay("", &["git::https://repo1.dso.mil/big-bang/bigbang.git//base?ref=2.52.0"]);
        src.file("configmap.yaml", "kind: ConfigMap\n");
        let dest = OverlayTree::new();
        let root_src = NormalizedPath::new(src.root());
        let root_dest = NormalizedPath::new(dest.root());

        LocalMaterializer::new(NormalizedPath::new("/clone/base"), root_src.clone(), root_dest.clone())
            .materialize(&root_src, &root_dest)
            .unwrap();

        let descriptor = Descriptor::load(&root_dest).unwrap();
        assert_eq!(descriptor.bases(), vec!["/clone/base".to_string()]);
        dest.assert_file_exists("configmap.yaml");
    }
}
