use std::ops::Index;

use common::Buffer2;

use crate::dsu::DisjointSet;
use crate::error::{Result, check_index};
use crate::graph::GridContext;

/// Dense 0-based label per pixel.
///
/// Labels are assigned in first-encountered order of a row-major sweep, so
/// pixel 0 always carries label 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Buffer2<u32>,
    num_labels: usize,
}

impl LabelMap {
    /// Relabels the components of `dsu` in row-major first-seen order.
    pub(crate) fn from_dsu(dsu: &mut DisjointSet, grid: GridContext) -> Self {
        debug_assert_eq!(dsu.len(), grid.pixel_count());

        const UNASSIGNED: u32 = u32::MAX;
        let mut root_to_label = vec![UNASSIGNED; dsu.len()];
        let mut next_label = 0u32;

        let mut labels = Vec::with_capacity(dsu.len());
        for idx in 0..dsu.len() {
            let root = dsu.find_root(idx);
            let label = &mut root_to_label[root];
            if *label == UNASSIGNED {
                *label = next_label;
                next_label += 1;
            }
            labels.push(*label);
        }

        Self {
            labels: Buffer2::new(grid.width, grid.height, labels),
            num_labels: next_label as usize,
        }
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    pub fn grid(&self) -> GridContext {
        GridContext::new(self.width(), self.height())
    }

    #[inline]
    pub fn labels(&self) -> &[u32] {
        self.labels.pixels()
    }

    pub fn as_buffer(&self) -> &Buffer2<u32> {
        &self.labels
    }

    /// Label of pixel `idx`.
    pub fn label(&self, idx: usize) -> Result<u32> {
        check_index(idx, self.labels.len())?;
        Ok(self.labels[idx])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        *self.labels.get(row, col)
    }

    /// Pixel count per label, indexed by label.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.num_labels];
        for &label in self.labels.iter() {
            sizes[label as usize] += 1;
        }
        sizes
    }

    /// Pixel counts of all segments, largest first.
    pub fn sizes_descending(&self) -> Vec<usize> {
        let mut sizes = self.sizes();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

impl Index<usize> for LabelMap {
    type Output = u32;

    #[inline]
    fn index(&self, idx: usize) -> &u32 {
        &self.labels[idx]
    }
}
