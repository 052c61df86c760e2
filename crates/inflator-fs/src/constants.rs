//! Well-known file and directory names in an overlay tree.

use std::path::Path;

/// Reserved names the overlay walks look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPath {
    /// `kustomization.yaml`, the preferred descriptor name
    Descriptor,
    /// `kustomization.yml`, the fallback descriptor name
    DescriptorAlt,
    /// `secrets.enc.yaml`, the encrypted values fragment
    EncryptedFragment,
    /// `.git`, never mirrored by the materializer
    GitDir,
    /// `__pycache__`, never mirrored by the materializer
    BytecodeCache,
}

impl OverlayPath {
    /// Descriptor names in lookup order.
    pub const DESCRIPTORS: [OverlayPath; 2] = [Self::Descriptor, Self::DescriptorAlt];

    /// Directory names skipped when copying an overlay tree.
    pub const EXCLUDED_DIRS: [OverlayPath; 2] = [Self::GitDir, Self::BytecodeCache];

    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptor => "kustomization.yaml",
            Self::DescriptorAlt => "kustomization.yml",
            Self::EncryptedFragment => "secrets.enc.yaml",
            Self::GitDir => ".git",
            Self::BytecodeCache => "__pycache__",
        }
    }

    /// Whether `name` is excluded from tree copies.
    pub fn is_excluded_dir(name: &str) -> bool {
        Self::EXCLUDED_DIRS.iter().any(|p| p.as_str() == name)
    }

    /// Whether `name` looks like a descriptor file, including editor backups
    /// such as `kustomization.yaml.orig`.
    pub fn is_descriptor_name(name: &str) -> bool {
        Self::DESCRIPTORS.iter().any(|p| name.starts_with(p.as_str()))
    }
}

impl AsRef<Path> for OverlayPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for OverlayPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for OverlayPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
