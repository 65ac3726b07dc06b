//! Edge lists over the pixel grid.
//!
//! Two front ends produce [`Edge`] lists for the merge loop:
//! - [`grid`]: fixed 4- or 8-neighborhood, weights are channel intensity
//!   differences (`u8`)
//! - [`ann`]: k-nearest neighbors in (x, y, r, g, b) feature space, weights are
//!   Euclidean distances (`f64`)

pub mod ann;
pub mod grid;


pub use ann::{AnnGraph, FEATURE_DIM, FeaturePoint, build_ann_graph, feature_points};
pub use grid::build_grid_edges;

use crate::config::Connectivity;

/// Undirected weighted edge between two pixel indices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edge<W> {
    pub u: u32,
    pub v: u32,
    pub weight: W,
}

impl<W> Edge<W> {
    #[inline]
    pub fn new(u: usize, v: usize, weight: W) -> Self {
        Self {
            u: u as u32,
            v: v as u32,
            weight,
        }
    }

    /// Endpoints with the smaller index first.
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        if self.u <= self.v {
            (self.u, self.v)
        } else {
            (self.v, self.u)
        }
    }
}

/// Weight type the merge loop can order and compare against thresholds.
pub trait EdgeWeight: Copy + PartialOrd + Send + Sync + std::fmt::Debug {
    fn to_f64(self) -> f64;

    /// Sorts by ascending weight.
    fn sort_ascending(edges: &mut Vec<Edge<Self>>);
}

impl EdgeWeight for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    /// Stable counting sort over the 256 possible weights.
    fn sort_ascending(edges: &mut Vec<Edge<u8>>) {
        let mut offsets = [0usize; 257];
        for edge in edges.iter() {
            offsets[edge.weight as usize + 1] += 1;
        }
        for w in 1..offsets.len() {
            offsets[w] += offsets[w - 1];
        }

        let mut sorted = vec![Edge::default(); edges.len()];
        for edge in edges.iter() {
            let slot = &mut offsets[edge.weight as usize];
            sorted[*slot] = *edge;
            *slot += 1;
        }
        *edges = sorted;
    }
}

impl EdgeWeight for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    fn sort_ascending(edges: &mut Vec<Edge<f64>>) {
        edges.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    }
}

impl Connectivity {
    /// `(row, col)` offsets that reach every neighbor pair exactly once when
    /// applied from each pixel: down, down-right, down-left, right.
    pub fn forward_offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &[(1, 0), (0, 1)],
            Connectivity::Eight => &[(1, 0), (1, 1), (1, -1), (0, 1)],
        }
    }
}

/// Shape of the pixel grid, passed explicitly to everything indexing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridContext {
    pub width: usize,
    pub height: usize,
}

impl GridContext {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn pixel_index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// In-bounds neighbors of `(row, col)` reached by the forward offsets.
    #[inline]
    pub fn forward_neighbors(
        self,
        row: usize,
        col: usize,
        connectivity: Connectivity,
    ) -> impl Iterator<Item = usize> {
        connectivity
            .forward_offsets()
            .iter()
            .filter_map(move |&(d_row, d_col)| {
                let r = row.checked_add_signed(d_row)?;
                let c = col.checked_add_signed(d_col)?;
                (r < self.height && c < self.width).then(|| self.pixel_index(r, c))
            })
    }
}
