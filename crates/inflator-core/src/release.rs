//! Release descriptor and its declared values order

use std::fmt;

use serde_yaml::Value;

use crate::manifest::{kind_of, name_of};
use crate::{Error, Result};

/// Kind tag of the release object.
pub const RELEASE_KIND: &str = "HelmRelease";

/// Kind of object a values fragment comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    /// Plaintext `ConfigMap` with `data["values.yaml"]`
    ConfigMap,
    /// Encrypted `Secret` with `stringData["values.yaml"]`
    Secret,
    /// Anything else; never merged
    Other(String),
}

impl FragmentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for FragmentKind {
    fn from(kind: &str) -> Self {
        match kind {
            "ConfigMap" => Self::ConfigMap,
            "Secret" => Self::Secret,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `valuesFrom` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesReference {
    pub kind: FragmentKind,
    pub name: String,
}

impl ValuesReference {
    pub fn new(kind: impl Into<FragmentKind>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// The release's `valuesFrom` list: first listed, first merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceOrder {
    entries: Vec<ValuesReference>,
}

impl ReferenceOrder {
    pub fn new(entries: Vec<ValuesReference>) -> Self {
        Self { entries }
    }

    /// Extract the order from the release named `release_name` in `docs`.
    ///
    /// The first matching release wins. Entries lacking a string `kind` or
    /// `name` are dropped.
    pub fn from_documents(docs: &[Value], release_name: &str) -> Result<Self> {
        let release = docs
            .iter()
            .find(|doc| kind_of(doc) == Some(RELEASE_KIND) && name_of(doc) == Some(release_name))
            .ok_or_else(|| Error::ReleaseNotFound {
                name: release_name.to_string(),
            })?;

        let entries = release
            .get("spec")
            .and_then(|spec| spec.get("valuesFrom"))
            .and_then(Value::as_sequence)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let kind = item.get("kind").and_then(Value::as_str)?;
                        let name = item.get("name").and_then(Value::as_str)?;
                        Some(ValuesReference::new(kind, name))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let order = Self::new(entries);
        tracing::debug!(release = release_name, entries = order.len(), "Read valuesFrom order");
        Ok(order)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValuesReference> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ValuesReference> for ReferenceOrder {
    fn from_iter<T: IntoIterator<Item = ValuesReference>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
