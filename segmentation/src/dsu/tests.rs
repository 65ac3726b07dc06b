//! Tests for the disjoint-set forest.

use rand::prelude::*;

use super::*;
use crate::error::Error;

#[test]
fn test_new_all_singletons() {
    let mut dsu = DisjointSet::new(5);
    assert_eq!(dsu.len(), 5);
    assert_eq!(dsu.component_count(), 5);
    for i in 0..5 {
        assert_eq!(dsu.find(i).unwrap(), i);
        assert_eq!(dsu.size(i).unwrap(), 1);
        assert_eq!(dsu.max_internal_edge(i).unwrap(), 0.0);
    }
}

#[test]
fn test_empty() {
    let mut dsu = DisjointSet::new(0);
    assert!(dsu.is_empty());
    assert!(matches!(
        dsu.find(0),
        Err(Error::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn test_union_merges_size_and_max_edge() {
    let mut dsu = DisjointSet::new(4);
    assert!(dsu.union(0, 1, 3.0).unwrap());
    assert!(dsu.union(2, 3, 7.0).unwrap());
    assert!(dsu.union(1, 2, 5.0).unwrap());

    assert_eq!(dsu.component_count(), 1);
    assert_eq!(dsu.size(3).unwrap(), 4);
    // max(3, 7, 5)
    assert_eq!(dsu.max_internal_edge(0).unwrap(), 7.0);
}

#[test]
fn test_union_already_connected_is_noop() {
    let mut dsu = DisjointSet::new(3);
    dsu.union(0, 1, 2.0).unwrap();
    assert!(!dsu.union(1, 0, 100.0).unwrap());
    assert_eq!(dsu.size(0).unwrap(), 2);
    assert_eq!(dsu.max_internal_edge(0).unwrap(), 2.0);
    assert_eq!(dsu.component_count(), 2);
}

#[test]
fn test_union_by_size_keeps_larger_root() {
    let mut dsu = DisjointSet::new(4);
    dsu.union(0, 1, 0.0).unwrap();
    dsu.union(0, 2, 0.0).unwrap();
    let big_root = dsu.find(0).unwrap();
    dsu.union(3, 0, 0.0).unwrap();
    assert_eq!(dsu.find(3).unwrap(), big_root);
}

#[test]
fn test_out_of_range_rejected() {
    let mut dsu = DisjointSet::new(3);
    assert!(matches!(
        dsu.union(0, 3, 1.0),
        Err(Error::IndexOutOfRange { index: 3, len: 3 })
    ));
    assert!(dsu.size(10).is_err());
    assert!(dsu.max_internal_edge(3).is_err());
    assert!(dsu.raise_max_internal_edge(3, 1.0).is_err());
    // nothing was modified by the failed calls
    assert_eq!(dsu.component_count(), 3);
}

#[test]
fn test_raise_max_internal_edge_only_increases() {
    let mut dsu = DisjointSet::new(2);
    dsu.union(0, 1, 4.0).unwrap();
    dsu.raise_max_internal_edge(1, 2.0).unwrap();
    assert_eq!(dsu.max_internal_edge(0).unwrap(), 4.0);
    dsu.raise_max_internal_edge(1, 9.0).unwrap();
    assert_eq!(dsu.max_internal_edge(0).unwrap(), 9.0);
}

#[test]
fn test_long_chain_does_not_overflow_stack() {
    // Build a worst-case chain by linking raw roots in sequence, bypassing union-by-size.
    let n = 1_000_000;
    let mut dsu = DisjointSet::new(n);
    for i in 1..n {
        dsu.parent[i - 1] = i as u32;
    }
    assert_eq!(dsu.find(0).unwrap(), n - 1);
    // path fully compressed
    assert_eq!(dsu.parent[0] as usize, n - 1);
    assert_eq!(dsu.parent[n / 2] as usize, n - 1);
}

#[test]
fn test_random_unions_preserve_invariants() {
    let n = 500;
    let mut rng = StdRng::seed_from_u64(42);
    let mut dsu = DisjointSet::new(n);
    let mut last_max = vec![0.0f64; n];

    for _ in 0..2_000 {
        let x = rng.random_range(0..n);
        let y = rng.random_range(0..n);
        let w = rng.random_range(0.0..255.0);
        dsu.union(x, y, w).unwrap();

        // maxInternalEdge seen from any element never decreases
        for (i, last) in last_max.iter_mut().enumerate() {
            let current = dsu.max_internal_edge(i).unwrap();
            assert!(current >= *last);
            *last = current;
        }
    }

    let mut roots = Vec::new();
    for i in 0..n {
        let root = dsu.find(i).unwrap();
        assert_eq!(dsu.find(root).unwrap(), root, "find must be idempotent");
        roots.push(root);
    }
    roots.sort_unstable();
    roots.dedup();

    assert_eq!(roots.len(), dsu.component_count());
    let total: usize = roots.iter().map(|&r| dsu.size(r).unwrap()).sum();
    assert_eq!(total, n);
}
