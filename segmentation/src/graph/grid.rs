//! Fixed-neighborhood pixel graph for one channel.

use common::Buffer2;

use super::{Edge, GridContext};
use crate::config::Connectivity;

/// One edge per adjacent pixel pair, weighted by `|channel[u] - channel[v]|`.
///
/// Edges are emitted in row-major order of their first endpoint, following
/// [`Connectivity::forward_offsets`], so no pair appears twice.
pub fn build_grid_edges(channel: &Buffer2<u8>, connectivity: Connectivity) -> Vec<Edge<u8>> {
    let grid = GridContext::new(channel.width(), channel.height());
    let mut edges = Vec::with_capacity(grid.pixel_count() * connectivity.forward_offsets().len());

    for row in 0..grid.height {
        for col in 0..grid.width {
            let u = grid.pixel_index(row, col);
            let value = channel[u];
            for v in grid.forward_neighbors(row, col, connectivity) {
                edges.push(Edge::new(u, v, value.abs_diff(channel[v])));
            }
        }
    }

    edges
}
