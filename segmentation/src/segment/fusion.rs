//! Fusion of the three per-channel partitions into the final one.

use crate::config::Connectivity;
use crate::dsu::DisjointSet;
use crate::error::{Error, Result};
use crate::graph::GridContext;

use super::label_map::LabelMap;

/// Joins adjacent pixels whose `(red, green, blue)` label triplets are equal.
///
/// Adjacency follows the same forward template as the grid graph. Pixels
/// sharing a triplet but not connected through same-triplet neighbors stay
/// in separate regions, so the result has at least as many regions as there
/// are distinct triplets.
pub fn fuse_labels(channels: &[LabelMap; 3], connectivity: Connectivity) -> Result<LabelMap> {
    let grid = channels[0].grid();
    for other in &channels[1..] {
        let other_grid = other.grid();
        if other_grid != grid {
            return Err(Error::DimensionMismatch {
                expected: (grid.width, grid.height),
                actual: (other_grid.width, other_grid.height),
            });
        }
    }

    let [red, green, blue] = channels;
    let triplet = |idx: usize| (red[idx], green[idx], blue[idx]);

    let mut dsu = DisjointSet::new(grid.pixel_count());
    for row in 0..grid.height {
        for col in 0..grid.width {
            let idx = grid.pixel_index(row, col);
            let own = triplet(idx);
            for neighbor in grid.forward_neighbors(row, col, connectivity) {
                if triplet(neighbor) != own {
                    continue;
                }
                let a = dsu.find_root(idx);
                let b = dsu.find_root(neighbor);
                if a != b {
                    dsu.union_roots(a, b, 0.0);
                }
            }
        }
    }

    Ok(LabelMap::from_dsu(&mut dsu, grid))
}

/// Number of distinct `(red, green, blue)` label triplets.
pub fn distinct_triplets(channels: &[LabelMap; 3]) -> usize {
    let [red, green, blue] = channels;
    let triplets: hashbrown::HashSet<(u32, u32, u32)> = (0..red.labels().len())
        .map(|idx| (red[idx], green[idx], blue[idx]))
        .collect();
    triplets.len()
}
