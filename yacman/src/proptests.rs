//! Property-based tests for merging, rendering and path handling.

use crate::codec::{dump, load_str};
use crate::manager::deep_merge;
use crate::path::resolve_components;
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 /._-]{0,16}".prop_map(Value::from),
    ]
}

fn mapping_strategy() -> impl Strategy<Value = Mapping> {
    let leaf = scalar_strategy();
    let value = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec((key_strategy(), inner), 0..4).prop_map(|pairs| {
            Value::Mapping(
                pairs
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), v))
                    .collect(),
            )
        })
    });
    prop::collection::vec((key_strategy(), value), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (Value::String(k), v))
            .collect()
    })
}

fn path_strategy() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec(
        prop_oneof![Just("..".to_string()), Just(".".to_string()), "[a-z]{1,6}"],
        0..8,
    )
    .prop_map(|parts| {
        let mut path = PathBuf::from("/");
        for part in parts {
            path.push(part);
        }
        path
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Every top-level key of the overlay ends up in the result
    #[test]
    fn merge_keeps_overlay_keys(base in mapping_strategy(), overlay in mapping_strategy()) {
        let mut merged = base.clone();
        deep_merge(&mut merged, overlay.clone());
        for key in overlay.keys() {
            prop_assert!(merged.contains_key(key));
        }
        for key in base.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }

    // Scalar values of the overlay always win
    #[test]
    fn merge_overlay_scalars_win(base in mapping_strategy(), overlay in mapping_strategy()) {
        let mut merged = base;
        deep_merge(&mut merged, overlay.clone());
        for (key, value) in &overlay {
            if !value.is_mapping() {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    // Merging a mapping over itself changes nothing
    #[test]
    fn merge_with_self_is_identity(data in mapping_strategy()) {
        let mut merged = data.clone();
        deep_merge(&mut merged, data.clone());
        prop_assert_eq!(merged, data);
    }

    // Rendering then parsing reproduces the mapping
    #[test]
    fn dump_then_load_is_identity(data in mapping_strategy()) {
        let text = dump(&data).unwrap();
        let reparsed = load_str(&text).unwrap();
        prop_assert_eq!(reparsed, data);
    }

    // Resolved absolute paths never contain "." or ".." components
    #[test]
    fn resolved_paths_have_no_dot_components(path in path_strategy()) {
        let resolved = resolve_components(&path);
        prop_assert!(resolved.is_absolute());
        prop_assert!(!resolved.components().any(|c| matches!(
            c,
            std::path::Component::CurDir | std::path::Component::ParentDir
        )));
    }
}
