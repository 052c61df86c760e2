//! Ordered values merging
//!
//! The release's `valuesFrom` list is replayed over the collected fragment
//! tables; each fragment found is deep-merged onto the running result, so
//! later entries override earlier ones.

use serde_yaml::{Mapping, Value};

use crate::collector::FragmentTable;
use crate::manifest::{is_empty_document, parse_values};
use crate::merge::deep_merge;
use crate::release::{FragmentKind, ReferenceOrder, ValuesReference};
use crate::{Error, Result};

/// Folds fragments into a single values document.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValuesMergeEngine;

impl ValuesMergeEngine {
    pub fn new() -> Self {
        Self
    }

    /// Merge the fragments named by `order`.
    ///
    /// ConfigMap entries are looked up exactly in `plain`. Secret entries are
    /// looked up exactly in `encrypted`, falling back to the first fragment
    /// whose name is a prefix of the requested one. Missing and empty
    /// fragments are skipped. Fails with [`Error::NoData`] if nothing was
    /// merged.
    pub fn merge(
        &self,
        order: &ReferenceOrder,
        plain: &FragmentTable,
        encrypted: &FragmentTable,
    ) -> Result<Value> {
        let mut merged = Value::Mapping(Mapping::new());

        for reference in order.iter() {
            let Some(raw) = lookup(reference, plain, encrypted) else {
                tracing::debug!(kind = %reference.kind, name = %reference.name, "No fragment found");
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }

            let values = parse_values(raw).map_err(|e| Error::FragmentParse {
                kind: reference.kind.to_string(),
                name: reference.name.clone(),
                message: e.to_string(),
            })?;
            if is_empty_document(&values) {
                continue;
            }

            tracing::debug!(kind = %reference.kind, name = %reference.name, "Merging fragment");
            merged = deep_merge(&merged, &values);
        }

        if is_empty_document(&merged) {
            return Err(Error::NoData);
        }
        Ok(merged)
    }
}

fn lookup<'a>(
    reference: &ValuesReference,
    plain: &'a FragmentTable,
    encrypted: &'a FragmentTable,
) -> Option<&'a str> {
    match &reference.kind {
        FragmentKind::ConfigMap => plain.get(&reference.name),
        FragmentKind::Secret => encrypted.get(&reference.name).or_else(|| {
            // Generated Secrets may carry a hash suffix the release omits
            encrypted
                .iter()
                .find(|(name, _)| reference.name.starts_with(name))
                .map(|(name, raw)| {
                    tracing::debug!(requested = %reference.name, matched = name, "Prefix-matched Secret");
                    raw
                })
        }),
        FragmentKind::Other(kind) => {
            tracing::debug!(kind, name = %reference.name, "Ignoring unsupported valuesFrom kind");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn order(entries: &[(&str, &str)]) -> ReferenceOrder {
        entries
            .iter()
            .map(|(kind, name)| ValuesReference::new(*kind, *name))
            .collect()
    }

    #[test]
    fn test_later_entries_win() {
        let plain: FragmentTable = [("a", "x: 1\nkeep: yes\n"), ("b", "x: 2\n")].into_iter().collect();

        let merged = ValuesMergeEngine::new()
            .merge(&order(&[("ConfigMap", "a"), ("ConfigMap", "b")]), &plain, &FragmentTable::new())
            .unwrap();

        assert_eq!(merged, yaml("x: 2\nkeep: yes\n"));
    }

    #[test]
    fn test_order_comes_from_release_not_tables() {
        let plain: FragmentTable = [("a", "x: 1\n"), ("b", "x: 2\n")].into_iter().collect();

        let merged = ValuesMergeEngine::new()
            .merge(&order(&[("ConfigMap", "b"), ("ConfigMap", "a")]), &plain, &FragmentTable::new())
            .unwrap();

        assert_eq!(merged, yaml("x: 1\n"));
    }

    #[test]
    fn test_secret_overrides_configmap_across_tables() {
        let plain: FragmentTable = [("X", "a: 1")].into_iter().collect();
        let encrypted: FragmentTable = [("Y", "a: 2\nb: 3")].into_iter().collect();

        let merged = ValuesMergeEngine::new()
            .merge(&order(&[("ConfigMap", "X"), ("Secret", "Y")]), &plain, &encrypted)
            .unwrap();

        assert_eq!(merged, yaml("a: 2\nb: 3\n"));
    }

    #[test]
    fn test_secret_exact_then_prefix() {
        let encrypted: FragmentTable = [("common", "s: prefix\n"), ("common-bb", "s: exact\n")]
            .into_iter()
            .collect();
        let engine = ValuesMergeEngine::new();

        let exact = engine
            .merge(&order(&[("Secret", "common-bb")]), &FragmentTable::new(), &encrypted)
            .unwrap();
        let prefix = engine
            .merge(&order(&[("Secret", "common-bb-7f9c")]), &FragmentTable::new(), &encrypted)
            .unwrap();

        assert_eq!(exact, yaml("s: exact\n"));
        assert_eq!(prefix, yaml("s: prefix\n"));
    }

    #[test]
    fn test_configmap_is_exact_only() {
        let plain: FragmentTable = [("env", "x: 1\n")].into_iter().collect();

        let err = ValuesMergeEngine::new()
            .merge(&order(&[("ConfigMap", "env-abc")]), &plain, &FragmentTable::new())
            .unwrap_err();

        assert!(matches!(err, Error::NoData));
    }

    #[test]
    fn test_empty_and_unsupported_fragments_skipped() {
        let plain: FragmentTable = [("blank", "   \n"), ("null", "~\n"), ("env", "x: 1\n")]
            .into_iter()
            .collect();

        let merged = ValuesMergeEngine::new()
            .merge(
                &order(&[
                    ("ConfigMap", "blank"),
                    ("ConfigMap", "null"),
                    ("Values", "env"),
                    ("ConfigMap", "env"),
                ]),
                &plain,
                &FragmentTable::new(),
            )
            .unwrap();

        assert_eq!(merged, yaml("x: 1\n"));
    }

    #[test]
    fn test_invalid_fragment_is_error() {
        let plain: FragmentTable = [("env", "x: [1, 2\n")].into_iter().collect();

        let err = ValuesMergeEngine::new()
            .merge(&order(&[("ConfigMap", "env")]), &plain, &FragmentTable::new())
            .unwrap_err();

        assert!(matches!(err, Error::FragmentParse { ref name, .. } if name == "env"));
    }

    #[test]
    fn test_empty_order_is_no_data() {
        let err = ValuesMergeEngine::new()
            .merge(&ReferenceOrder::default(), &FragmentTable::new(), &FragmentTable::new())
            .unwrap_err();
        assert!(matches!(err, Error::NoData));
    }
}
