//! Base reference parsing
//!
//! A descriptor's `bases` entries are either local paths or remote git
//! sources of the form:
//!
//! ```text
//! git::https://host/org/repo.git//sub/dir?ref=1.2.3
//! ^^^^^ marker  ^^^^^^^^^^^^^^^^^^ url  ^^^^^^^ subdir  ^^^^^ revision
//! ```

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Prefix marking a remote base reference.
pub const REMOTE_MARKER: &str = "git::";

const REVISION_MARKER: &str = "?ref=";
const SCHEME_SEPARATOR: &str = "://";
const SUBDIR_SEPARATOR: &str = "//";
const NETWORK_SCHEMES: [&str; 2] = ["https://", "http://"];

/// A remote git source pinned (ideally) to a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteReference {
    /// Clone URL, without trailing slashes
    pub url: String,
    /// Branch, tag, or commit; `None` when the reference had no `?ref=`
    pub revision: Option<String>,
    /// Path inside the repository, without leading slashes; may be empty
    pub subdir: String,
}

impl RemoteReference {
    /// The pinned revision, or [`Error::MissingRevision`].
    pub fn require_revision(&self) -> Result<&str> {
        self.revision
            .as_deref()
            .ok_or_else(|| Error::MissingRevision {
                url: self.url.clone(),
            })
    }
}

impl fmt::Display for RemoteReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REMOTE_MARKER}{}", self.url)?;
        if !self.subdir.is_empty() {
            write!(f, "{SUBDIR_SEPARATOR}{}", self.subdir)?;
        }
        if let Some(revision) = &self.revision {
            write!(f, "{REVISION_MARKER}{revision}")?;
        }
        Ok(())
    }
}

/// A path to another overlay, relative to the referencing descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReference {
    pub path: String,
}

/// One entry of a descriptor's `bases` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseReference {
    Remote(RemoteReference),
    Local(LocalReference),
}

impl BaseReference {
    /// Classify and parse a single base reference string.
    pub fn parse(reference: &str) -> Result<Self> {
        let Some(stripped) = reference.strip_prefix(REMOTE_MARKER) else {
            return Ok(Self::Local(LocalReference {
                path: reference.to_string(),
            }));
        };

        let remote = match stripped.split_once(REVISION_MARKER) {
            Some((url_part, revision)) => {
                let (url, subdir) = split_subdir(url_part);
                RemoteReference {
                    url: url.trim_end_matches('/').to_string(),
                    revision: Some(revision.to_string()),
                    subdir: subdir.trim_start_matches('/').to_string(),
                }
            }
            // Without a revision the whole remainder is the URL
            None => RemoteReference {
                url: stripped.to_string(),
                revision: None,
                subdir: String::new(),
            },
        };

        if remote.url.is_empty() {
            return Err(Error::InvalidReference {
                reference: reference.to_string(),
                reason: "remote source URL is empty".to_string(),
            });
        }

        Ok(Self::Remote(remote))
    }
}

/// Split `url_part` at the subdirectory separator.
///
/// For network URLs the search starts after `scheme://` so the scheme's own
/// slashes are not mistaken for the separator.
fn split_subdir(url_part: &str) -> (&str, &str) {
    let search_from = if NETWORK_SCHEMES.iter().any(|s| url_part.starts_with(s)) {
        url_part
            .find(SCHEME_SEPARATOR)
            .map_or(0, |idx| idx + SCHEME_SEPARATOR.len())
    } else {
        0
    };

    match url_part[search_from..].find(SUBDIR_SEPARATOR) {
        Some(idx) => {
            let split = search_from + idx;
            (
                &url_part[..split],
                &url_part[split + SUBDIR_SEPARATOR.len()..],
            )
        }
        None => (url_part, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn remote(reference: &str) -> RemoteReference {
        match BaseReference::parse(reference).unwrap() {
            BaseReference::Remote(remote) => remote,
            other => panic!("expected remote, got {other:?}"),
        }
    }

    #[test]
    fn test_full_remote_reference() {
        let parsed = remote("git::https://host/repo//sub?ref=v1.2.3");

        assert_eq!(
            parsed,
            RemoteReference {
                url: "https://host/repo".into(),
                revision: Some("v1.2.3".into()),
                subdir: "sub".into(),
            }
        );
    }

    #[rstest]
    #[case("git::https://repo1.dso.mil/big-bang/bigbang.git//base?ref=2.52.0", "https://repo1.dso.mil/big-bang/bigbang.git", "base")]
    #[case("git::https://host/repo/?ref=1.0", "https://host/repo", "")]
    #[case("git::http://host/repo//a/b?ref=1.0", "http://host/repo", "a/b")]
    #[case("git::https://host/repo///deep?ref=1.0", "https://host/repo", "deep")]
    // Only http(s) gets scheme-aware splitting
    #[case("git::ssh://git@host/repo//chart?ref=1.0", "ssh:", "git@host/repo//chart")]
    #[case("git::git@host:org/repo.git//chart?ref=1.0", "git@host:org/repo.git", "chart")]
    fn test_url_and_subdir_split(#[case] input: &str, #[case] url: &str, #[case] subdir: &str) {
        let parsed = remote(input);
        assert_eq!(parsed.url, url);
        assert_eq!(parsed.subdir, subdir);
        assert!(parsed.revision.is_some());
    }

    #[test]
    fn test_revision_split_at_first_marker() {
        let parsed = remote("git::https://host/repo?ref=a?ref=b");
        assert_eq!(parsed.revision.as_deref(), Some("a?ref=b"));
    }

    #[test]
    fn test_missing_revision_is_absent() {
        let parsed = remote("git::https://host/repo//sub");

        assert_eq!(parsed.url, "https://host/repo//sub");
        assert_eq!(parsed.subdir, "");
        assert_eq!(parsed.revision, None);
        assert!(matches!(
            parsed.require_revision(),
            Err(Error::MissingRevision { .. })
        ));
    }

    #[rstest]
    #[case("../base")]
    #[case("./level1")]
    #[case("https://host/repo//sub?ref=1.0")]
    fn test_without_marker_is_local(#[case] input: &str) {
        assert_eq!(
            BaseReference::parse(input).unwrap(),
            BaseReference::Local(LocalReference { path: input.into() })
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        assert!(matches!(
            BaseReference::parse("git::?ref=1.0"),
            Err(Error::InvalidReference { .. })
        ));
        assert!(matches!(
            BaseReference::parse("git::"),
            Err(Error::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let input = "git::https://host/repo//charts/app?ref=1.0.0";
        assert_eq!(remote(input).to_string(), input);
    }
}
