//! Randomized property checks for the binary search tree index.

use bid_index::{BinarySearchTree, DuplicatePolicy, IndexConfig, Record};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn bid(id: &str, amount: f64) -> Record {
    Record::new(id, format!("item {}", id), "General Fund", amount)
}

fn ids(tree: &BinarySearchTree) -> Vec<String> {
    tree.iter().map(|r| r.id.clone()).collect()
}

fn random_ids(rng: &mut StdRng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| rng.gen_range(0..5_000u32).to_string())
        .collect()
}

#[test]
fn in_order_is_sorted_for_any_insertion_order() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let mut tree = BinarySearchTree::new();
        for id in random_ids(&mut rng, 200) {
            tree.insert(bid(&id, 1.0)).unwrap();
        }

        let listed = ids(&tree);
        assert!(listed.windows(2).all(|w| w[0] <= w[1]), "unsorted: {:?}", listed);
        assert_eq!(listed.len(), tree.len());
    }
}

#[test]
fn matches_btreemap_model_under_replace() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = BinarySearchTree::new();
    let mut model: BTreeMap<String, Record> = BTreeMap::new();

    for step in 0..5_000 {
        let id = rng.gen_range(0..300u32).to_string();
        if rng.gen_bool(0.6) {
            let record = bid(&id, step as f64);
            let previous = tree.insert(record.clone()).unwrap();
            assert_eq!(previous, model.insert(id, record));
        } else {
            assert_eq!(tree.remove(&id), model.remove(&id));
        }

        assert_eq!(tree.len(), model.len());
    }

    for (id, record) in &model {
        assert_eq!(tree.find(id), Some(record));
    }
    let expected: Vec<&Record> = model.values().collect();
    let actual: Vec<&Record> = tree.iter().collect();
    assert_eq!(actual, expected);
}

#[test]
fn removal_drops_exactly_one_record() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut keys: Vec<String> = (0..500).map(|i| format!("{:04}", i)).collect();
    keys.shuffle(&mut rng);

    let mut tree = BinarySearchTree::new();
    for id in &keys {
        tree.insert(bid(id, 0.0)).unwrap();
    }

    keys.shuffle(&mut rng);
    for id in &keys {
        let before = ids(&tree);
        assert!(tree.remove(id).is_some());
        assert_eq!(tree.find(id), None);

        let expected: Vec<String> = before.into_iter().filter(|k| k != id).collect();
        assert_eq!(ids(&tree), expected);

        // Second removal leaves the tree unchanged
        assert_eq!(tree.remove(id), None);
        assert_eq!(ids(&tree), expected);
    }

    assert!(tree.is_empty());
}

#[test]
fn scenario_in_order_listing() {
    let mut tree = BinarySearchTree::new();
    for id in ["5", "3", "8", "1"] {
        tree.insert(bid(id, 0.0)).unwrap();
    }
    assert_eq!(ids(&tree), vec!["1", "3", "5", "8"]);
}

#[test]
fn scenario_find_hit_and_miss() {
    let mut tree = BinarySearchTree::new();
    for id in ["5", "3", "8"] {
        tree.insert(bid(id, 3.0)).unwrap();
    }
    assert_eq!(tree.find("3"), Some(&bid("3", 3.0)));
    assert_eq!(tree.find("9"), None);
}

#[test]
fn scenario_remove_node_with_two_children() {
    let mut tree = BinarySearchTree::new();
    for id in ["5", "3", "8", "7", "9"] {
        tree.insert(bid(id, 0.0)).unwrap();
    }

    tree.remove("8");
    assert_eq!(ids(&tree), vec!["3", "5", "7", "9"]);
    assert!(tree.find("9").is_some());
    assert_eq!(tree.height(), 3);
}

#[test]
fn scenario_remove_from_empty_tree() {
    let mut tree = BinarySearchTree::new();
    assert_eq!(tree.remove("42"), None);
    assert!(tree.is_empty());
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn keep_both_lists_every_duplicate() {
    let config = IndexConfig::new().duplicate_policy(DuplicatePolicy::KeepBoth);
    let mut tree = BinarySearchTree::with_config(config);
    let mut rng = StdRng::seed_from_u64(3);

    let mut inserted = Vec::new();
    for _ in 0..300 {
        let id = rng.gen_range(0..40u32).to_string();
        tree.insert(bid(&id, 0.0)).unwrap();
        inserted.push(id);
    }
    inserted.sort();

    assert_eq!(tree.len(), 300);
    assert_eq!(ids(&tree), inserted);
}

#[test]
fn sorted_input_does_not_overflow() {
    let mut tree = BinarySearchTree::new();
    for i in 0..20_000 {
        tree.insert(bid(&format!("{:06}", i), 0.0)).unwrap();
    }

    assert_eq!(tree.height(), 20_000);
    assert!(tree.find("019999").is_some());
    assert_eq!(tree.iter().count(), 20_000);
    assert!(tree.remove("000000").is_some());
    drop(tree);
}
