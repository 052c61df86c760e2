//! [`OverlayTree`] builder for overlay directory graphs.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding a graph of overlay descriptors.
///
/// # Example
///
/// ```rust,no_run
/// use inflator_test_utils::OverlayTree;
///
/// let tree = OverlayTree::new();
/// tree.overlay("envs/prod", &["../../base"]);
/// tree.overlay("base", &["git::https://example.com/chart//app?ref=1.0.0"]);
/// tree.assert_file_exists("envs/prod/kustomization.yaml");
/// ```
pub struct OverlayTree {
    temp_dir: TempDir,
}

impl Default for OverlayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree.
    pub fn path(&self, rel: &str) -> PathBuf {
        if rel.is_empty() || rel == "." {
            self.root().to_path_buf()
        } else {
            self.root().join(rel)
        }
    }

    /// Write `rel/kustomization.yaml` listing `bases` in order.
    pub fn overlay(&self, rel: &str, bases: &[&str]) -> PathBuf {
        let mut content = String::from("apiVersion: kustomize.config.k8s.io/v1beta1\nkind: Kustomization\n");
        if bases.is_empty() {
            content.push_str("bases: []\n");
        } else {
            content.push_str("bases:\n");
            for base in bases {
                content.push_str(&format!("  - \"{base}\"\n"));
            }
        }
        self.file(&format!("{}/kustomization.yaml", self.normalize_rel(rel)), &content)
    }

    /// Write `rel/kustomization.yaml` with raw `content`.
    pub fn descriptor(&self, rel: &str, content: &str) -> PathBuf {
        self.file(&format!("{}/kustomization.yaml", self.normalize_rel(rel)), content)
    }

    /// Write an arbitrary file, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let full = self.path(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content)
            .unwrap_or_else(|e| panic!("OverlayTree::file: failed to write {rel}: {e}"));
        full
    }

    /// Create an empty directory.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let full = self.path(rel);
        fs::create_dir_all(&full).unwrap();
        full
    }

    /// Read a file relative to the root.
    pub fn read(&self, rel: &str) -> String {
        let full = self.path(rel);
        fs::read_to_string(&full)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full.display()))
    }

    /// Assert that `rel` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, rel: &str) {
        let full = self.path(rel);
        assert!(full.exists(), "Expected file to exist: {}", full.display());
    }

    /// Assert that `rel` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, rel: &str) {
        let full = self.path(rel);
        assert!(
            !full.exists(),
            "Expected file NOT to exist: {}",
            full.display()
        );
    }

    fn normalize_rel<'a>(&self, rel: &'a str) -> &'a str {
        if rel.is_empty() { "." } else { rel }
    }
}
