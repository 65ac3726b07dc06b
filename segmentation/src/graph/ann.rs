//! Feature-space nearest-neighbor graph.
//!
//! Every pixel becomes a point `(x, y, red, green, blue)`. A k-d tree over all
//! points is built once and queried for each pixel's `k + 1` nearest
//! neighbors (the extra slot is the pixel itself). Each non-self neighbor
//! contributes one undirected edge weighted by the feature-space distance;
//! a pair already connected from the other side is not added again.

use hashbrown::HashSet;
use rayon::prelude::*;

use super::Edge;
use crate::error::{Error, Result};
use crate::image::PixelMatrix;
use crate::spatial::KdTree;

/// Dimensions of a pixel feature point.
pub const FEATURE_DIM: usize = 5;

pub type FeaturePoint = [f64; FEATURE_DIM];

/// `(x, y, red, green, blue)` for every pixel, in pixel-index order.
pub fn feature_points(image: &PixelMatrix) -> Vec<FeaturePoint> {
    let mut points = Vec::with_capacity(image.len());
    for row in 0..image.height() {
        for col in 0..image.width() {
            let px = image.get(row, col);
            points.push([
                col as f64,
                row as f64,
                px.red as f64,
                px.green as f64,
                px.blue as f64,
            ]);
        }
    }
    points
}

/// Undirected k-nearest-neighbor graph over pixels.
#[derive(Debug, Clone)]
pub struct AnnGraph {
    adjacency: Vec<Vec<(u32, f64)>>,
    edges: Vec<Edge<f64>>,
}

impl AnnGraph {
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `(neighbor, distance)` pairs of `vertex`, in insertion order.
    pub fn neighbors(&self, vertex: usize) -> &[(u32, f64)] {
        &self.adjacency[vertex]
    }

    pub fn edges(&self) -> &[Edge<f64>] {
        &self.edges
    }

    pub fn into_edges(self) -> Vec<Edge<f64>> {
        self.edges
    }
}

/// Builds the feature-space graph with `neighbors` edges attempted per pixel.
///
/// `epsilon` is the approximation slack of the tree search; 0 gives exact
/// neighbors.
pub fn build_ann_graph(image: &PixelMatrix, neighbors: usize, epsilon: f64) -> Result<AnnGraph> {
    if neighbors == 0 {
        return Err(Error::InvalidNeighborCount);
    }
    if !(epsilon.is_finite() && epsilon >= 0.0) {
        return Err(Error::InvalidEpsilon(epsilon));
    }

    let points = feature_points(image);
    let n = points.len();
    let tree = KdTree::build(&points).ok_or(Error::EmptyImage {
        width: image.width(),
        height: image.height(),
    })?;

    // Queries only read the tree, so they run in parallel; insertion below stays
    // sequential in pixel order to keep the edge list deterministic.
    let neighbor_lists: Vec<_> = points
        .par_iter()
        .map(|point| tree.k_nearest_approx(point, neighbors + 1, epsilon))
        .collect();

    let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); n];
    let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(n * neighbors);
    let mut edges = Vec::with_capacity(n * neighbors);

    for (i, found) in neighbor_lists.iter().enumerate() {
        for neighbor in found {
            if neighbor.index == i {
                continue;
            }
            let edge = Edge::new(i, neighbor.index, neighbor.distance());
            if !seen.insert(edge.key()) {
                continue;
            }
            adjacency[i].push((edge.v, edge.weight));
            adjacency[neighbor.index].push((edge.u, edge.weight));
            edges.push(edge);
        }
    }

    tracing::debug!(
        pixels = n,
        neighbors,
        epsilon,
        edges = edges.len(),
        "Built feature-space neighbor graph"
    );

    Ok(AnnGraph { adjacency, edges })
}
