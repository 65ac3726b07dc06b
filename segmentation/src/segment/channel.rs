//! Threshold merging of one channel's edge list.

use crate::config::{SameComponentPolicy, validate_scale};
use crate::dsu::DisjointSet;
use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeWeight, GridContext};

use super::label_map::LabelMap;

/// Felzenszwalb–Huttenlocher greedy merge over an edge list.
///
/// Edges are processed in ascending weight. Two components `A` and `B` joined
/// by an edge of weight `w` merge when
///
/// ```text
/// w <= min(max_internal(A) + k / |A|, max_internal(B) + k / |B|)
/// ```
///
/// The `k / |C|` term lets small components absorb stronger edges, so large
/// `k` yields fewer, larger regions.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSegmenter {
    k: f64,
    policy: SameComponentPolicy,
}

impl ChannelSegmenter {
    pub fn new(k: f64, policy: SameComponentPolicy) -> Result<Self> {
        validate_scale(k)?;
        Ok(Self { k, policy })
    }

    #[inline]
    pub fn k(&self) -> f64 {
        self.k
    }

    #[inline]
    fn threshold(&self, dsu: &DisjointSet, root: usize) -> f64 {
        dsu.root_max_internal_edge(root) + self.k / dsu.root_size(root) as f64
    }

    /// Segments the pixels of `grid` connected by `edges`.
    ///
    /// Pixels without edges stay singletons. Every edge endpoint must be a
    /// pixel of `grid`.
    pub fn segment<W: EdgeWeight>(
        &self,
        grid: GridContext,
        mut edges: Vec<Edge<W>>,
    ) -> Result<LabelMap> {
        let pixel_count = grid.pixel_count();
        if let Some(edge) = edges
            .iter()
            .find(|e| e.u as usize >= pixel_count || e.v as usize >= pixel_count)
        {
            return Err(Error::IndexOutOfRange {
                index: (edge.u.max(edge.v)) as usize,
                len: pixel_count,
            });
        }

        W::sort_ascending(&mut edges);

        let mut dsu = DisjointSet::new(pixel_count);
        let mut merges = 0usize;

        for edge in &edges {
            let root_u = dsu.find_root(edge.u as usize);
            let root_v = dsu.find_root(edge.v as usize);
            let weight = edge.weight.to_f64();

            if root_u == root_v {
                if self.policy == SameComponentPolicy::RaiseThreshold {
                    dsu.raise_root_max_internal_edge(root_u, weight);
                }
                continue;
            }

            let limit = self
                .threshold(&dsu, root_u)
                .min(self.threshold(&dsu, root_v));
            if weight <= limit {
                dsu.union_roots(root_u, root_v, weight);
                merges += 1;
            }
        }

        let labels = LabelMap::from_dsu(&mut dsu, grid);
        tracing::trace!(
            edges = edges.len(),
            merges,
            regions = labels.num_labels(),
            "Channel merge finished"
        );
        Ok(labels)
    }
}
