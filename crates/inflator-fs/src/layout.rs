//! Descriptor discovery within an overlay directory

use crate::{NormalizedPath, OverlayPath};

/// Locate the descriptor file of `dir`.
///
/// `kustomization.yaml` takes precedence over `kustomization.yml`. Returns
/// `None` when the directory has neither.
pub fn find_descriptor(dir: &NormalizedPath) -> Option<NormalizedPath> {
    OverlayPath::DESCRIPTORS
        .iter()
        .map(|name| dir.join(name.as_str()))
        .find(|candidate| candidate.is_file())
}
