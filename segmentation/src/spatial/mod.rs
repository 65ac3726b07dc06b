//! K-d tree over fixed-dimension points.
//!
//! Used by the feature-space graph builder with 5-D `(x, y, r, g, b)` points:
//! - built once from a snapshot of all points, immutable afterwards
//! - splitting axis cycles as `depth % D`, median found by in-place quickselect
//! - k-nearest-neighbor queries with optional approximation slack

#[cfg(test)]
mod tests;

use std::cmp::Ordering;

/// Balanced k-d tree over `D`-dimensional points.
#[derive(Debug)]
pub struct KdTree<const D: usize> {
    nodes: Vec<KdNode>,
    points: Vec<[f64; D]>,
    root: Option<usize>,
}

#[derive(Debug, Clone)]
struct KdNode {
    /// Index into the points array
    point_idx: usize,
    left: Option<usize>,
    right: Option<usize>,
    split_dim: usize,
}

/// A query result: point index and squared distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub dist_sq: f64,
}

impl Neighbor {
    #[inline]
    pub fn distance(&self) -> f64 {
        self.dist_sq.sqrt()
    }

    /// Orders by distance, then by index.
    #[inline]
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then(self.index.cmp(&other.index))
    }
}

impl<const D: usize> KdTree<D> {
    /// Builds the tree; `None` if `points` is empty.
    pub fn build(points: &[[f64; D]]) -> Option<Self> {
        if points.is_empty() || D == 0 {
            return None;
        }

        let points = points.to_vec();
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());

        let root = Self::build_recursive(&points, &mut indices, 0, &mut nodes);

        Some(Self {
            nodes,
            points,
            root,
        })
    }

    fn build_recursive(
        points: &[[f64; D]],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut Vec<KdNode>,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let split_dim = depth % D;
        let median = indices.len() / 2;

        // Quickselect: everything left of `median` is <= it on this axis,
        // everything right is >=.
        indices.select_nth_unstable_by(median, |&a, &b| {
            points[a][split_dim].total_cmp(&points[b][split_dim])
        });

        let node_idx = nodes.len();
        nodes.push(KdNode {
            point_idx: indices[median],
            left: None,
            right: None,
            split_dim,
        });

        let (left_indices, right_part) = indices.split_at_mut(median);
        let right_indices = &mut right_part[1..];

        let left = Self::build_recursive(points, left_indices, depth + 1, nodes);
        let right = Self::build_recursive(points, right_indices, depth + 1, nodes);

        nodes[node_idx].left = left;
        nodes[node_idx].right = right;

        Some(node_idx)
    }

    /// Exact k nearest neighbors, sorted by distance then index.
    pub fn k_nearest(&self, query: &[f64; D], k: usize) -> Vec<Neighbor> {
        self.k_nearest_approx(query, k, 0.0)
    }

    /// K nearest neighbors with approximation slack `epsilon >= 0`.
    ///
    /// A far subtree is only visited when `(1 + epsilon)` times the distance
    /// to its splitting plane does not exceed the current k-th best distance.
    /// With `epsilon = 0` the result is exact; larger values prune more and may
    /// miss true neighbors.
    pub fn k_nearest_approx(&self, query: &[f64; D], k: usize, epsilon: f64) -> Vec<Neighbor> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let slack_sq = (1.0 + epsilon.max(0.0)).powi(2);
        let mut heap = BoundedMaxHeap::new(k);
        self.search(root, query, slack_sq, &mut heap);

        let mut result = heap.into_vec();
        result.sort_by(Neighbor::cmp_key);
        result
    }

    fn search(&self, node_idx: usize, query: &[f64; D], slack_sq: f64, heap: &mut BoundedMaxHeap) {
        let node = &self.nodes[node_idx];
        let point = &self.points[node.point_idx];

        heap.push(Neighbor {
            index: node.point_idx,
            dist_sq: distance_squared(query, point),
        });

        let diff = query[node.split_dim] - point[node.split_dim];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near_idx) = near {
            self.search(near_idx, query, slack_sq, heap);
        }

        // Points beyond the plane are at least |diff| away. Ties are still
        // visited since a farther-side point may win on index.
        if let Some(far_idx) = far
            && (!heap.is_full() || diff * diff * slack_sq <= heap.max_dist_sq())
        {
            self.search(far_idx, query, slack_sq, heap);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, idx: usize) -> &[f64; D] {
        &self.points[idx]
    }

    /// Depth of the deepest leaf (a single node has depth 1).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[KdNode], idx: Option<usize>) -> usize {
            match idx {
                Some(i) => 1 + walk(nodes, nodes[i].left).max(walk(nodes, nodes[i].right)),
                None => 0,
            }
        }
        walk(&self.nodes, self.root)
    }
}

#[inline]
fn distance_squared<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Max-heap holding the k best neighbors seen so far, keyed by
/// `(dist_sq, index)` so ties resolve the same way regardless of visit order.
#[derive(Debug)]
struct BoundedMaxHeap {
    capacity: usize,
    items: Vec<Neighbor>,
}

impl BoundedMaxHeap {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, item: Neighbor) {
        if self.items.len() < self.capacity {
            self.items.push(item);
            self.sift_up(self.items.len() - 1);
        } else if item.cmp_key(&self.items[0]) == Ordering::Less {
            self.items[0] = item;
            self.sift_down(0);
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    fn max_dist_sq(&self) -> f64 {
        self.items.first().map_or(f64::INFINITY, |n| n.dist_sq)
    }

    fn into_vec(self) -> Vec<Neighbor> {
        self.items
    }

    #[inline]
    fn greater(&self, a: usize, b: usize) -> bool {
        self.items[a].cmp_key(&self.items[b]) == Ordering::Greater
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.greater(idx, parent) {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut largest = idx;

            if left < self.items.len() && self.greater(left, largest) {
                largest = left;
            }
            if right < self.items.len() && self.greater(right, largest) {
                largest = right;
            }

            if largest == idx {
                break;
            }
            self.items.swap(idx, largest);
            idx = largest;
        }
    }
}
