//! Configuration types for segmentation.
//!
//! [`Config`] is a flat struct with serde support so it can be loaded from a
//! YAML file; every field has a default matching the values the interactive
//! tool shipped with (`k = 300`, `sigma = 0.8`, 5-tap smoothing).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Enums
// ============================================================================

/// Pixel adjacency used both for the grid graph and for label fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Horizontal and vertical neighbors only.
    Four,
    /// Horizontal, vertical and diagonal neighbors.
    #[default]
    Eight,
}

/// What the merge loop does with an edge whose endpoints are already in one
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameComponentPolicy {
    /// Ignore the edge. This is the canonical Felzenszwalb–Huttenlocher rule.
    #[default]
    Skip,
    /// Raise the component's maximum internal edge to the edge weight without
    /// merging anything. Reproduces an older variant of the tool; it makes
    /// later merges slightly more permissive.
    RaiseThreshold,
}

/// Color assignment for the label visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Palette {
    /// Six saturated colors cycled by label.
    #[default]
    Fixed,
    /// One random color per label, reproducible from the seed.
    Random { seed: u64 },
}

// ============================================================================
// Smoothing
// ============================================================================

/// Largest accepted smoothing kernel, in taps.
pub const MAX_FILTER_SIZE: usize = 1025;

/// Gaussian pre-smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Standard deviation of the Gaussian, in pixels.
    pub sigma: f64,
    /// Number of kernel taps. Even values are rounded up to the next odd one.
    pub filter_size: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            sigma: 0.8,
            filter_size: 5,
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(Error::InvalidSigma(self.sigma));
        }
        if self.filter_size == 0 || self.filter_size > MAX_FILTER_SIZE {
            return Err(Error::InvalidFilterSize(self.filter_size));
        }
        Ok(())
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scale parameter. Larger values favor larger regions.
    pub k: f64,
    /// Smoothing applied before graph construction; `None` disables it.
    pub smoothing: Option<SmoothingConfig>,
    pub connectivity: Connectivity,
    pub same_component_policy: SameComponentPolicy,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            k: 300.0,
            smoothing: Some(SmoothingConfig::default()),
            connectivity: Connectivity::default(),
            same_component_policy: SameComponentPolicy::default(),
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Config with the given scale and no smoothing.
    pub fn with_k(k: f64) -> Self {
        Self {
            k,
            smoothing: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_scale(self.k)?;
        if let Some(smoothing) = &self.smoothing {
            smoothing.validate()?;
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str, origin: &Path) -> Result<Self> {
        let config: Self = serde_yml::from_str(yaml).map_err(|source| Error::ParseConfig {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml, path)
    }
}

pub(crate) fn validate_scale(k: f64) -> Result<()> {
    if k.is_finite() && k > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScale(k))
    }
}
