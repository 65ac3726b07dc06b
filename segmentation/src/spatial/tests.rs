//! Tests for the k-d tree.

use rand::prelude::*;

use super::*;

fn brute_force<const D: usize>(points: &[[f64; D]], query: &[f64; D], k: usize) -> Vec<Neighbor> {
    let mut all: Vec<Neighbor> = points
        .iter()
        .enumerate()
        .map(|(index, p)| Neighbor {
            index,
            dist_sq: distance_squared(query, p),
        })
        .collect();
    all.sort_by(Neighbor::cmp_key);
    all.truncate(k);
    all
}

fn indices(neighbors: &[Neighbor]) -> Vec<usize> {
    neighbors.iter().map(|n| n.index).collect()
}

#[test]
fn test_build_empty() {
    let points: [[f64; 2]; 0] = [];
    assert!(KdTree::build(&points).is_none());
}

#[test]
fn test_build_single_point() {
    let tree = KdTree::build(&[[1.0, 2.0, 3.0]]).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.depth(), 1);
    let found = tree.k_nearest(&[0.0, 0.0, 0.0], 3);
    assert_eq!(indices(&found), vec![0]);
    assert!((found[0].dist_sq - 14.0).abs() < 1e-12);
}

#[test]
fn test_k_nearest_order() {
    let points = [
        [0.0, 0.0],  // dist_sq 0
        [1.0, 0.0],  // 1
        [2.0, 0.0],  // 4
        [3.0, 0.0],  // 9
        [10.0, 0.0], // 100
    ];
    let tree = KdTree::build(&points).unwrap();

    let neighbors = tree.k_nearest(&[0.0, 0.0], 3);
    assert_eq!(indices(&neighbors), vec![0, 1, 2]);
    assert!((neighbors[2].dist_sq - 4.0).abs() < 1e-12);
    assert!((neighbors[2].distance() - 2.0).abs() < 1e-12);
}

#[test]
fn test_k_nearest_more_than_available() {
    let tree = KdTree::build(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
    assert_eq!(tree.k_nearest(&[0.0, 0.0], 10).len(), 2);
    assert!(tree.k_nearest(&[0.0, 0.0], 0).is_empty());
}

#[test]
fn test_clustered_points() {
    let mut points = Vec::new();
    for i in 0..5 {
        let t = i as f64 * 0.1;
        points.push([t, t, 0.0, 0.0, 0.0]);
    }
    for i in 0..5 {
        let t = 100.0 + i as f64 * 0.1;
        points.push([t, t, 50.0, 50.0, 50.0]);
    }
    let tree = KdTree::build(&points).unwrap();

    let neighbors = tree.k_nearest(&[0.0; 5], 5);
    assert!(neighbors.iter().all(|n| n.index < 5));
}

#[test]
fn test_tree_is_balanced() {
    let points: Vec<[f64; 5]> = (0..1023)
        .map(|i| {
            let v = i as f64;
            [v, (v * 7.0) % 13.0, (v * 3.0) % 5.0, 0.0, v / 2.0]
        })
        .collect();
    let tree = KdTree::build(&points).unwrap();
    // 1023 = 2^10 - 1 points fill a perfect tree of depth 10
    assert_eq!(tree.depth(), 10);
}

#[test]
fn test_matches_brute_force_random_5d() {
    let mut rng = StdRng::seed_from_u64(7);
    let points: Vec<[f64; 5]> = (0..600)
        .map(|_| std::array::from_fn(|_| rng.random_range(-100.0..100.0)))
        .collect();
    let tree = KdTree::build(&points).unwrap();

    for _ in 0..100 {
        let query: [f64; 5] = std::array::from_fn(|_| rng.random_range(-120.0..120.0));
        let k = rng.random_range(1..20);
        let found = tree.k_nearest(&query, k);
        let expected = brute_force(&points, &query, k);
        assert_eq!(indices(&found), indices(&expected));
    }
}

#[test]
fn test_matches_brute_force_with_ties() {
    // Integer pixel-like features produce many equal distances.
    let mut rng = StdRng::seed_from_u64(11);
    let points: Vec<[f64; 5]> = (0..400)
        .map(|_| std::array::from_fn(|_| rng.random_range(0..4) as f64))
        .collect();
    let tree = KdTree::build(&points).unwrap();

    for query in points.iter().take(50) {
        for k in [1, 5, 11, 40] {
            let found = tree.k_nearest(query, k);
            let expected = brute_force(&points, query, k);
            assert_eq!(indices(&found), indices(&expected));
        }
    }
}

#[test]
fn test_epsilon_results_are_valid_and_no_closer_than_exact() {
    let mut rng = StdRng::seed_from_u64(3);
    let points: Vec<[f64; 5]> = (0..500)
        .map(|_| std::array::from_fn(|_| rng.random_range(0.0..255.0)))
        .collect();
    let tree = KdTree::build(&points).unwrap();

    for query in points.iter().take(30) {
        let exact = tree.k_nearest(query, 8);
        let approx = tree.k_nearest_approx(query, 8, 2.0);
        assert_eq!(approx.len(), 8);

        let mut unique = indices(&approx);
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 8);

        for (a, e) in approx.iter().zip(exact.iter()) {
            assert!(a.dist_sq >= e.dist_sq - 1e-9);
            assert!((a.dist_sq - distance_squared(query, &points[a.index])).abs() < 1e-9);
        }
        // the query point itself is always found first
        assert_eq!(approx[0].dist_sq, 0.0);
    }
}

#[test]
fn test_concurrent_queries() {
    use rayon::prelude::*;

    let points: Vec<[f64; 3]> = (0..200)
        .map(|i| [i as f64, (i % 10) as f64, (i / 10) as f64])
        .collect();
    let tree = KdTree::build(&points).unwrap();

    let parallel: Vec<Vec<usize>> = points
        .par_iter()
        .map(|p| indices(&tree.k_nearest(p, 4)))
        .collect();
    let sequential: Vec<Vec<usize>> = points
        .iter()
        .map(|p| indices(&tree.k_nearest(p, 4)))
        .collect();
    assert_eq!(parallel, sequential);
}
