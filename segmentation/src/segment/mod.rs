//! Segmentation orchestrator.
//!
//! Pipeline for one image:
//! 1. Optional Gaussian smoothing
//! 2. Per channel: grid graph, then threshold merge (three channels run in
//!    parallel, each with its own edge list and disjoint-set forest)
//! 3. Label fusion over the three channel partitions
//! 4. Segment size statistics
//!
//! [`Segmenter`] wraps the pipeline with the stateful interface of the
//! interactive tool: run `segment`, then query statistics or save output.

mod channel;
mod fusion;
mod label_map;


use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use crate::config::{Config, SameComponentPolicy, validate_scale};
use crate::error::Result;
use crate::graph::{AnnGraph, GridContext, build_grid_edges};
use crate::image::{Channel, PixelMatrix};
use crate::output;
use crate::smoothing::smooth;

pub use channel::ChannelSegmenter;
pub use fusion::{distinct_triplets, fuse_labels};
pub use label_map::LabelMap;

/// Result of one segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    labels: LabelMap,
    channel_labels: [LabelMap; 3],
    segment_sizes: Vec<usize>,
}

impl Segmentation {
    pub fn num_segments(&self) -> usize {
        self.labels.num_labels()
    }

    /// Segment pixel counts, largest first.
    pub fn segment_sizes(&self) -> &[usize] {
        &self.segment_sizes
    }

    /// Final per-pixel labels.
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Partition computed for a single channel before fusion.
    pub fn channel_labels(&self, channel: Channel) -> &LabelMap {
        match channel {
            Channel::Red => &self.channel_labels[0],
            Channel::Green => &self.channel_labels[1],
            Channel::Blue => &self.channel_labels[2],
        }
    }

    pub fn distinct_triplets(&self) -> usize {
        distinct_triplets(&self.channel_labels)
    }
}

/// Runs the full pipeline on `image` with `config`.
pub fn segment_image(image: &PixelMatrix, config: &Config) -> Result<Segmentation> {
    config.validate()?;
    let started = Instant::now();

    let smoothed = match &config.smoothing {
        Some(smoothing) => {
            let t = Instant::now();
            let blurred = smooth(image, smoothing.filter_size, smoothing.sigma)?;
            tracing::debug!(
                sigma = smoothing.sigma,
                filter_size = smoothing.filter_size,
                elapsed_ms = t.elapsed().as_secs_f64() * 1e3,
                "Smoothed input"
            );
            Cow::Owned(blurred)
        }
        None => Cow::Borrowed(image),
    };
    let smoothed: &PixelMatrix = &smoothed;

    let grid = smoothed.grid();
    let segmenter = ChannelSegmenter::new(config.k, config.same_component_policy)?;

    let run_channel = |channel: Channel| -> Result<LabelMap> {
        let t = Instant::now();
        let intensities = smoothed.channel(channel);
        let edges = build_grid_edges(&intensities, config.connectivity);
        let labels = segmenter.segment(grid, edges)?;
        tracing::debug!(
            %channel,
            regions = labels.num_labels(),
            elapsed_ms = t.elapsed().as_secs_f64() * 1e3,
            "Segmented channel"
        );
        Ok(labels)
    };

    let (red, (green, blue)) = rayon::join(
        || run_channel(Channel::Red),
        || {
            rayon::join(
                || run_channel(Channel::Green),
                || run_channel(Channel::Blue),
            )
        },
    );
    let channel_labels = [red?, green?, blue?];

    let t = Instant::now();
    let labels = fuse_labels(&channel_labels, config.connectivity)?;
    tracing::debug!(
        regions = labels.num_labels(),
        elapsed_ms = t.elapsed().as_secs_f64() * 1e3,
        "Fused channel labels"
    );

    let segment_sizes = labels.sizes_descending();

    tracing::info!(
        width = grid.width,
        height = grid.height,
        k = config.k,
        segments = segment_sizes.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "Segmentation finished"
    );

    Ok(Segmentation {
        labels,
        channel_labels,
        segment_sizes,
    })
}

/// Segments a feature-space neighbor graph built over `grid`-shaped pixels.
pub fn segment_ann_graph(
    graph: &AnnGraph,
    grid: GridContext,
    k: f64,
    policy: SameComponentPolicy,
) -> Result<LabelMap> {
    ChannelSegmenter::new(k, policy)?.segment(grid, graph.edges().to_vec())
}

/// Stateful front end: holds the configuration and the latest result.
#[derive(Debug, Default)]
pub struct Segmenter {
    config: Config,
    result: Option<Segmentation>,
}

impl Segmenter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            result: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segments `image` with the configured parameters.
    ///
    /// The previous result is dropped before the run; on error no result is kept.
    pub fn segment(&mut self, image: &PixelMatrix) -> Result<()> {
        self.result = None;
        self.result = Some(segment_image(image, &self.config)?);
        Ok(())
    }

    /// Segments `image` with scale `k`, keeping the other configured parameters.
    pub fn segment_with_k(&mut self, image: &PixelMatrix, k: f64) -> Result<()> {
        self.result = None;
        validate_scale(k)?;
        self.config.k = k;
        self.segment(image)
    }

    pub fn result(&self) -> Option<&Segmentation> {
        self.result.as_ref()
    }

    /// Number of final segments; 0 before the first successful run.
    pub fn num_segments(&self) -> usize {
        self.result.as_ref().map_or(0, Segmentation::num_segments)
    }

    /// Segment sizes, largest first; empty before the first successful run.
    pub fn segment_sizes(&self) -> &[usize] {
        self.result
            .as_ref()
            .map(Segmentation::segment_sizes)
            .unwrap_or_default()
    }

    /// Writes the text report and the label visualization.
    ///
    /// Before any run only the (empty) report is written.
    pub fn save_output(&self, text_path: &Path, image_path: &Path) -> Result<()> {
        output::write_report(text_path, self.segment_sizes())?;
        match &self.result {
            Some(result) => {
                output::save_visualization(image_path, result.labels(), self.config.palette)
            }
            None => {
                tracing::warn!(
                    path = %image_path.display(),
                    "No segmentation available, skipping visualization"
                );
                Ok(())
            }
        }
    }
}
