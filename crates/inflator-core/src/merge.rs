//! Structural deep merge of YAML documents
//!
//! Mappings merge key by key, recursively. Anything else is replaced
//! wholesale by the overlay side, including a mapping meeting a scalar.
//! Sequences are never concatenated.

use serde_yaml::{Mapping, Value};

/// Merge `overlay` onto `base`, returning a new document.
///
/// If either side is not a mapping the overlay wins unconditionally.
/// Neither input is modified.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            Value::Mapping(merge_mappings(base, overlay))
        }
        _ => overlay.clone(),
    }
}

/// Mapping-typed form of [`deep_merge`].
///
/// Keys keep the position they first had in `base`; keys only present in
/// `overlay` are appended in overlay order.
pub fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut result = base.clone();

    for (key, value) in overlay {
        let merged = match (result.get(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                Value::Mapping(merge_mappings(existing, incoming))
            }
            _ => value.clone(),
        };
        result.insert(key.clone(), merged);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn yaml(source: &str) -> Value {
        serde_yaml::from_str(source).unwrap()
    }

    #[test]
    fn test_nested_mappings_merge() {
        let base = yaml("istio:\n  enabled: true\n  values:\n    replicas: 1\n");
        let overlay = yaml("istio:\n  values:\n    replicas: 3\n    hpa: true\n");

        let merged = deep_merge(&base, &overlay);

        assert_eq!(
            merged,
            yaml("istio:\n  enabled: true\n  values:\n    replicas: 3\n    hpa: true\n")
        );
    }

    #[test]
    fn test_sequences_replaced_not_concatenated() {
        let base = yaml("hosts: [a, b]\n");
        let overlay = yaml("hosts: [c]\n");

        assert_eq!(deep_merge(&base, &overlay), yaml("hosts: [c]\n"));
    }

    #[test]
    fn test_type_changes_take_overlay() {
        let base = yaml("a:\n  nested: 1\nb: scalar\n");
        let overlay = yaml("a: flat\nb:\n  now: mapping\n");

        assert_eq!(
            deep_merge(&base, &overlay),
            yaml("a: flat\nb:\n  now: mapping\n")
        );
    }

    #[test]
    fn test_non_mapping_arguments_return_overlay() {
        assert_eq!(deep_merge(&yaml("a: 1"), &yaml("[1, 2]")), yaml("[1, 2]"));
        assert_eq!(deep_merge(&yaml("[1]"), &yaml("a: 1")), yaml("a: 1"));
        assert_eq!(deep_merge(&yaml("a: 1"), &Value::Null), Value::Null);
    }

    #[test]
    fn test_key_order_is_stable() {
        let base = yaml("z: 1\na: 1\n");
        let overlay = yaml("m: 2\nz: 2\n");

        let merged = deep_merge(&base, &overlay);
        let keys: Vec<&str> = merged
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();

        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
