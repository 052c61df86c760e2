//! Values fragment collection
//!
//! Plaintext fragments come from ConfigMaps in the rendered manifest stream.
//! Encrypted fragments live in `secrets.enc.yaml` files scattered across the
//! overlay graph; they are discovered by walking local bases, decrypted one by
//! one, and mined for Secrets.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use serde_yaml::Value;

use inflator_fs::{NormalizedPath, OverlayPath, find_descriptor};

use crate::descriptor::Descriptor;
use crate::manifest::{parse_documents, values_fragment};
use crate::reference::BaseReference;
use crate::release::FragmentKind;
use crate::runner::CommandRunner;
use crate::tools::ExternalTools;
use crate::Result;

const CONFIG_MAP_SECTION: &str = "data";
const SECRET_SECTION: &str = "stringData";

/// Name-keyed raw values text.
///
/// Iterates in first-insertion order. Inserting an existing name replaces
/// its text in place, so the last-seen fragment wins without disturbing the
/// order other lookups depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentTable {
    entries: Vec<(String, String)>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, raw: impl Into<String>) {
        let name = name.into();
        let raw = raw.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = raw,
            None => self.entries.push((name, raw)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, raw)| raw.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, R: Into<String>> FromIterator<(N, R)> for FragmentTable {
    fn from_iter<T: IntoIterator<Item = (N, R)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (name, raw) in iter {
            table.insert(name, raw);
        }
        table
    }
}

/// Collect ConfigMap values fragments from rendered manifests.
pub fn collect_plain(docs: &[Value]) -> FragmentTable {
    let mut table = FragmentTable::new();
    for doc in docs {
        if let Some((name, raw)) =
            values_fragment(doc, FragmentKind::ConfigMap.as_str(), CONFIG_MAP_SECTION)
        {
            tracing::debug!(name, "Found ConfigMap");
            table.insert(name, raw);
        }
    }
    table
}

/// Discover every encrypted fragment file reachable from `start_dir`.
///
/// Walks local bases only; remote bases are never followed. A directory
/// whose descriptor cannot be read is logged and its bases are abandoned.
pub fn collect_encrypted(start_dir: &NormalizedPath) -> Result<BTreeSet<PathBuf>> {
    let start = NormalizedPath::absolute(start_dir)?;
    let mut found = BTreeSet::new();
    let mut seen: HashSet<NormalizedPath> = HashSet::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }

        let candidate = current.join(OverlayPath::EncryptedFragment.as_str());
        if candidate.is_file() {
            found.insert(candidate.to_native());
        }

        if find_descriptor(&current).is_none() {
            continue;
        }
        let descriptor = match Descriptor::load(&current) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!(dir = %current, error = %e, "Skipping unreadable descriptor");
                continue;
            }
        };

        for base in descriptor.bases() {
            if let Ok(BaseReference::Local(local)) = BaseReference::parse(&base) {
                stack.push(current.join(&local.path));
            }
        }
    }

    tracing::debug!(count = found.len(), "Found encrypted fragment files");
    Ok(found)
}

/// Decrypt `files` and collect their Secret values fragments.
///
/// A file that fails to decrypt or parse is logged and skipped.
pub fn decrypt_fragments<'a>(
    runner: &dyn CommandRunner,
    tools: &ExternalTools,
    files: impl IntoIterator<Item = &'a PathBuf>,
) -> FragmentTable {
    secret_values(runner, tools, files).into_iter().collect()
}

/// Every decrypted Secret values fragment, in discovery order.
///
/// Unlike [`decrypt_fragments`] duplicates are kept, which suits listing
/// them for inspection.
pub fn secret_values<'a>(
    runner: &dyn CommandRunner,
    tools: &ExternalTools,
    files: impl IntoIterator<Item = &'a PathBuf>,
) -> Vec<(String, String)> {
    let mut fragments = Vec::new();

    for file in files {
        tracing::debug!(file = %file.display(), "Decrypting");
        let plaintext = match tools.decrypt(runner, file) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Failed to decrypt");
                continue;
            }
        };

        let docs = match parse_documents(&plaintext) {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Error processing decrypted file");
                continue;
            }
        };

        for doc in &docs {
            if let Some((name, raw)) =
                values_fragment(doc, FragmentKind::Secret.as_str(), SECRET_SECTION)
            {
                tracing::debug!(name, "Found Secret");
                fragments.push((name.to_string(), raw.to_string()));
            }
        }
    }

    fragments
}
