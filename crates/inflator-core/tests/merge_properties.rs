//! Property tests for deep merging

use inflator_core::deep_merge;
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z]{0,6}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        prop::collection::vec(any::<i32>(), 0..3)
            .prop_map(|v| Value::Sequence(v.into_iter().map(|n| Value::Number(n.into())).collect())),
    ]
}

fn document() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(("[a-d]", inner), 0..4).prop_map(|entries| {
            let mut map = Mapping::new();
            for (k, v) in entries {
                map.insert(Value::String(k), v);
            }
            Value::Mapping(map)
        })
    })
}

fn mapping() -> impl Strategy<Value = Mapping> {
    prop::collection::vec(("[a-d]", document()), 0..4).prop_map(|entries| {
        let mut map = Mapping::new();
        for (k, v) in entries {
            map.insert(Value::String(k), v);
        }
        map
    })
}

proptest! {
    #[test]
    fn inputs_are_left_untouched(a in mapping(), b in mapping()) {
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = deep_merge(&Value::Mapping(a.clone()), &Value::Mapping(b.clone()));
        prop_assert_eq!(a, a_before);
        prop_assert_eq!(b, b_before);
    }

    #[test]
    fn empty_overlay_is_identity(a in mapping()) {
        let merged = deep_merge(&Value::Mapping(a.clone()), &Value::Mapping(Mapping::new()));
        prop_assert_eq!(merged, Value::Mapping(a));
    }

    #[test]
    fn disjoint_keys_union(a in mapping(), b in mapping()) {
        let b: Mapping = b
            .into_iter()
            .map(|(k, v)| (Value::String(format!("z{}", k.as_str().unwrap_or_default())), v))
            .collect();

        let merged = deep_merge(&Value::Mapping(a.clone()), &Value::Mapping(b.clone()));
        let merged = merged.as_mapping().unwrap();

        prop_assert_eq!(merged.len(), a.len() + b.len());
        for (k, v) in a.iter().chain(b.iter()) {
            prop_assert_eq!(merged.get(k), Some(v));
        }
    }

    #[test]
    fn overlay_scalars_win(a in mapping(), key in "[a-d]", value in leaf()) {
        let mut b = Mapping::new();
        b.insert(Value::String(key.clone()), value.clone());

        let merged = deep_merge(&Value::Mapping(a), &Value::Mapping(b));

        prop_assert_eq!(merged.get(key.as_str()), Some(&value));
    }

    #[test]
    fn non_mapping_overlay_replaces(a in mapping(), b in leaf()) {
        prop_assert_eq!(deep_merge(&Value::Mapping(a), &b), b);
    }
}
