// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property tests for hierarchy construction and the name index.

use ifc_lite_schema::{EntityHierarchy, EntityNameIndex, EntityRecord};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// `(parent, is_abstract)` per node; node `i` hangs under a node `< i`,
/// node 0 under `Entity`.
fn arb_tree() -> impl Strategy<Value = Vec<(Option<usize>, bool)>> {
    (1usize..16).prop_flat_map(|n| {
        (0..n)
            .map(|i| {
                let parent = if i == 0 {
                    Just(None).boxed()
                } else {
                    (0..i).prop_map(Some).boxed()
                };
                (parent, any::<bool>())
            })
            .collect::<Vec<_>>()
    })
}

fn name(i: usize) -> String {
    format!("IfcNode{i}")
}

fn records(tree: &[(Option<usize>, bool)]) -> Vec<EntityRecord> {
    tree.iter()
        .enumerate()
        .map(|(i, &(parent, is_abstract))| {
            let parent = parent.map(name).unwrap_or_else(|| "Entity".to_string());
            let mut record = EntityRecord::new(name(i), parent);
            record.is_abstract = is_abstract;
            if i % 2 == 0 {
                record = record.with_predefined_type(format!("{}TypeEnum", name(i)));
            }
            record
        })
        .collect()
}

fn build(records: &[EntityRecord]) -> EntityHierarchy {
    let mut tree = EntityHierarchy::new();
    for record in records {
        tree.add_record(record);
    }
    for i in (0..records.len()).step_by(2) {
        tree.add_predefined_type_list(&format!("{}TypeEnum", name(i)), [format!("VALUE{i}")]);
    }
    tree
}

fn arb_shuffled_feed() -> impl Strategy<Value = (Vec<EntityRecord>, Vec<EntityRecord>)> {
    arb_tree().prop_flat_map(|tree| {
        let feed = records(&tree);
        (Just(feed.clone()), Just(feed).prop_shuffle())
    })
}

fn super_type_names(tree: &EntityHierarchy, entity: &str) -> Vec<String> {
    tree.find_all_super_types(entity, &[])
        .iter()
        .map(|n| n.name().to_string())
        .collect()
}

// ============================================================================
// HIERARCHY PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn feed_order_does_not_matter((ordered, shuffled) in arb_shuffled_feed()) {
        let a = build(&ordered);
        let b = build(&shuffled);
        let n = ordered.len();

        prop_assert_eq!(a.len(), b.len());
        for i in 0..n {
            let x = name(i);
            prop_assert_eq!(super_type_names(&a, &x), super_type_names(&b, &x));
            prop_assert_eq!(a.get_predefined_type_list(&x), b.get_predefined_type_list(&x));
            prop_assert_eq!(a.is_abstract(&x), b.is_abstract(&x));
            for j in 0..n {
                let y = name(j);
                prop_assert_eq!(a.is_sub_type_of(&x, &y, true), b.is_sub_type_of(&x, &y, true));
                prop_assert_eq!(a.is_sub_type_of(&x, &y, false), b.is_sub_type_of(&x, &y, false));
            }
        }
    }

    #[test]
    fn strictness_and_antisymmetry((ordered, _) in arb_shuffled_feed()) {
        let tree = build(&ordered);
        for i in 0..ordered.len() {
            let x = name(i);
            prop_assert!(!tree.is_sub_type_of(&x, &x, true));
            prop_assert!(tree.is_sub_type_of(&x, &x, false));
            for j in 0..ordered.len() {
                let y = name(j);
                if i != j {
                    prop_assert!(!(tree.is_sub_type_of(&x, &y, true) && tree.is_sub_type_of(&y, &x, true)));
                }
                prop_assert_eq!(tree.is_sub_type_of(&x, &y, true), tree.is_super_type_of(&y, &x, true));
            }
        }
    }

    #[test]
    fn non_abstract_super_type_is_a_concrete_ancestor((ordered, _) in arb_shuffled_feed()) {
        let tree = build(&ordered);
        for i in 0..ordered.len() {
            let x = name(i);
            match tree.find_non_abstract_super_type(&x) {
                None => {
                    prop_assert!(super_type_names(&tree, &x)
                        .iter()
                        .all(|a| tree.is_abstract(a) == Some(true)));
                }
                Some(found) => {
                    prop_assert!(!found.is_abstract());
                    prop_assert!(tree.is_sub_type_of(&x, found.name(), true));
                    let again = tree.find_non_abstract_super_type(&x).map(|n| n.name());
                    prop_assert_eq!(again, Some(found.name()));
                }
            }
        }
    }
}

// ============================================================================
// NAME INDEX PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn every_substring_finds_its_name(
        names in prop::collection::vec("[A-Za-zΑ-ΡΣ-Ωα-ω]{1,10}", 1..8),
    ) {
        let index = EntityNameIndex::new(names.clone());
        for name in &names {
            let chars: Vec<char> = name.chars().collect();
            for start in 0..chars.len() {
                for end in start + 1..=chars.len() {
                    let query: String = chars[start..end].iter().collect();
                    prop_assert!(index.search(&query).contains(&name.as_str()));
                    prop_assert!(index.search(&query.to_uppercase()).contains(&name.as_str()));
                    prop_assert!(index.search(&query.to_lowercase()).contains(&name.as_str()));
                }
            }
        }
        prop_assert!(index.search("#").is_empty());
    }

    #[test]
    fn search_matches_linear_scan(
        names in prop::collection::vec("[a-dA-D]{1,6}", 0..8),
        query in "[a-dA-D]{0,3}",
    ) {
        let index = EntityNameIndex::new(names.clone());
        let needle = query.to_lowercase();
        let mut expected: Vec<&str> = names
            .iter()
            .filter(|n| n.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(index.search(&query), expected);
    }
}
