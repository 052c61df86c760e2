//! Normalized path handling for overlay graph walks

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to forward slashes with `.` and `..` resolved lexically.
///
/// Overlay directories are identified by their normalized path, so two
/// spellings of the same directory (`a/b/../c` and `a/c`) compare equal and
/// hash identically. Symlinks are not resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Make `path` absolute against the current working directory, without
    /// touching the filesystem beyond reading the cwd.
    pub fn absolute(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_absolute() {
            return Ok(Self::new(path));
        }
        let cwd = std::env::current_dir().map_err(|e| Error::io(path, e))?;
        Ok(Self::new(cwd.join(path)))
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment and normalize the result.
    ///
    /// An absolute segment replaces the path, like [`Path::join`].
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if segment.starts_with('/') {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Express this path relative to `base`.
    ///
    /// Both paths are compared component by component; the result climbs out
    /// of `base` with `..` as far as needed. Returns `.` when they are equal.
    pub fn relative_to(&self, base: &NormalizedPath) -> String {
        let target: Vec<&str> = components(&self.inner);
        let from: Vec<&str> = components(&base.inner);

        let common = target
            .iter()
            .zip(from.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = Vec::new();
        parts.extend(std::iter::repeat_n("..", from.len() - common));
        parts.extend(&target[common..]);

        if parts.is_empty() {
            ".".to_string()
        } else {
            parts.join("/")
        }
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".").collect()
}

/// Collapse repeated separators and resolve `.` and `..` segments.
fn clean(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in raw.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `/..` is `/`
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if absolute {
        format!("/{body}")
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a/b/../c", "/a/c")]
    #[case("/a/./b//c/", "/a/b/c")]
    #[case("a/../..", "..")]
    #[case("../x/../y", "../y")]
    #[case("/..", "/")]
    #[case("", ".")]
    #[case("a\\b", "a/b")]
    fn test_clean(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(NormalizedPath::new(input).as_str(), expected);
    }

    #[test]
    fn test_join_resolves_parent_segments() {
        let base = NormalizedPath::new("/overlays/prod");
        assert_eq!(base.join("../base").as_str(), "/overlays/base");
        assert_eq!(base.join("./patches").as_str(), "/overlays/prod/patches");
    }

    #[test]
    fn test_join_absolute_segment_replaces() {
        let base = NormalizedPath::new("/overlays/prod");
        assert_eq!(base.join("/elsewhere").as_str(), "/elsewhere");
    }

    #[rstest]
    #[case("/root/a/b", "/root", "a/b")]
    #[case("/root/shared", "/root/sub", "../shared")]
    #[case("/other/base", "/root/env/dev", "../../../other/base")]
    #[case("/root", "/root", ".")]
    fn test_relative_to(#[case] target: &str, #[case] base: &str, #[case] expected: &str) {
        let target = NormalizedPath::new(target);
        let base = NormalizedPath::new(base);
        assert_eq!(target.relative_to(&base), expected);
    }
}
