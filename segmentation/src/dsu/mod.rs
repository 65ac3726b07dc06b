//! Disjoint-set forest with per-component size and maximum internal edge.
//!
//! Parent links, sizes and internal-edge maxima live in flat arrays indexed by
//! element (pixel) index. `find` is iterative with full path compression, so
//! arbitrarily deep chains never touch the call stack; `union` attaches the
//! smaller tree under the larger one.
//!
//! The public methods validate indices and return [`Error::IndexOutOfRange`];
//! the merge loops use the unchecked `*_root` variants after validating their
//! edge lists once up front.

#[cfg(test)]
mod tests;

use crate::error::{Result, check_index};

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<u32>,
    size: Vec<u32>,
    max_internal_edge: Vec<f64>,
    components: usize,
}

impl DisjointSet {
    /// Creates `len` singleton components with size 1 and maximum internal edge 0.
    pub fn new(len: usize) -> Self {
        assert!(
            len <= u32::MAX as usize,
            "DisjointSet supports at most {} elements, got {}",
            u32::MAX,
            len
        );
        Self {
            parent: (0..len as u32).collect(),
            size: vec![1; len],
            max_internal_edge: vec![0.0; len],
            components: len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of distinct components.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Representative of `x`'s component. Compresses the visited path.
    pub fn find(&mut self, x: usize) -> Result<usize> {
        check_index(x, self.len())?;
        Ok(self.find_root(x))
    }

    /// Merges the components of `x` and `y`, recording `weight` as an internal edge.
    ///
    /// Returns `false` without touching anything if they were already connected.
    pub fn union(&mut self, x: usize, y: usize, weight: f64) -> Result<bool> {
        check_index(x, self.len())?;
        check_index(y, self.len())?;
        let root_x = self.find_root(x);
        let root_y = self.find_root(y);
        if root_x == root_y {
            return Ok(false);
        }
        self.union_roots(root_x, root_y, weight);
        Ok(true)
    }

    pub fn connected(&mut self, x: usize, y: usize) -> Result<bool> {
        Ok(self.find(x)? == self.find(y)?)
    }

    /// Pixel count of `x`'s component.
    pub fn size(&mut self, x: usize) -> Result<usize> {
        let root = self.find(x)?;
        Ok(self.root_size(root))
    }

    /// Largest edge weight merged into `x`'s component so far.
    pub fn max_internal_edge(&mut self, x: usize) -> Result<f64> {
        let root = self.find(x)?;
        Ok(self.root_max_internal_edge(root))
    }

    /// Raises `x`'s component maximum internal edge to `weight` if larger.
    pub fn raise_max_internal_edge(&mut self, x: usize, weight: f64) -> Result<()> {
        let root = self.find(x)?;
        self.raise_root_max_internal_edge(root, weight);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Unchecked operations for the merge loops
    // ------------------------------------------------------------------------

    #[inline]
    pub(crate) fn find_root(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }

        let mut node = x;
        while node != root {
            let next = self.parent[node] as usize;
            self.parent[node] = root as u32;
            node = next;
        }

        root
    }

    /// Links two distinct roots by size. Returns the surviving root.
    #[inline]
    pub(crate) fn union_roots(&mut self, root_x: usize, root_y: usize, weight: f64) -> usize {
        debug_assert_ne!(root_x, root_y);
        debug_assert_eq!(self.parent[root_x] as usize, root_x);
        debug_assert_eq!(self.parent[root_y] as usize, root_y);

        let (big, small) = if self.size[root_x] < self.size[root_y] {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };

        self.parent[small] = big as u32;
        self.size[big] += self.size[small];
        self.max_internal_edge[big] = self.max_internal_edge[big]
            .max(self.max_internal_edge[small])
            .max(weight);
        self.components -= 1;
        big
    }

    #[inline]
    pub(crate) fn root_size(&self, root: usize) -> usize {
        self.size[root] as usize
    }

    #[inline]
    pub(crate) fn root_max_internal_edge(&self, root: usize) -> f64 {
        self.max_internal_edge[root]
    }

    #[inline]
    pub(crate) fn raise_root_max_internal_edge(&mut self, root: usize, weight: f64) {
        let current = &mut self.max_internal_edge[root];
        if weight > *current {
            *current = weight;
        }
    }
}
