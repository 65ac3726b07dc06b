//! Segmentation - graph-based color image segmentation.
//!
//! Felzenszwalb–Huttenlocher threshold merging, run on each color channel of
//! an image independently, then fused into one labeling:
//! - Per-channel 4/8-connected grid graphs with intensity-difference weights
//! - Disjoint-set forest tracking component size and internal variation
//! - Three channels segmented concurrently, fused by label-triplet equality
//! - k-d tree and approximate nearest-neighbor graphs over pixel features
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use segmentation::{Config, PixelMatrix, Segmenter};
//!
//! let image = PixelMatrix::open("photo.png".as_ref())?;
//!
//! let mut segmenter = Segmenter::new(Config::default())?;
//! segmenter.segment(&image)?;
//!
//! println!("Found {} segments", segmenter.num_segments());
//! segmenter.save_output("segments.txt".as_ref(), "segments.png".as_ref())?;
//! ```

mod config;
pub mod dsu;
mod error;
pub mod graph;
mod image;
pub mod output;
mod segment;
pub mod smoothing;
pub mod spatial;

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{
    Config, Connectivity, MAX_FILTER_SIZE, Palette, SameComponentPolicy, SmoothingConfig,
};
pub use error::{Error, Result};

// ============================================================================
// Image types
// ============================================================================

pub use crate::image::{Channel, PixelMatrix, Rgb};

// ============================================================================
// Segmentation
// ============================================================================

pub use segment::{
    ChannelSegmenter, LabelMap, Segmentation, Segmenter, distinct_triplets, fuse_labels,
    segment_ann_graph, segment_image,
};

// ============================================================================
// Graphs and spatial indexing
// ============================================================================

pub use dsu::DisjointSet;
pub use graph::{AnnGraph, Edge, EdgeWeight, GridContext, build_ann_graph, build_grid_edges};
pub use spatial::{KdTree, Neighbor};
