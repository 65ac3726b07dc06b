//! segmenter CLI: segment an image and report region sizes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use segmentation::{Config, Connectivity, Palette, PixelMatrix, Segmenter, SmoothingConfig};

#[derive(Parser)]
#[command(name = "segmenter")]
#[command(about = "Segment a color image into regions with graph-based threshold merging")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    input: PathBuf,

    /// YAML configuration file. Command-line options override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scale parameter; larger values produce larger regions.
    #[arg(long)]
    k: Option<f64>,

    /// Gaussian smoothing sigma in pixels.
    #[arg(long)]
    sigma: Option<f64>,

    /// Gaussian kernel taps (even values round up to odd).
    #[arg(long)]
    filter_size: Option<usize>,

    /// Skip Gaussian smoothing.
    #[arg(long, conflicts_with_all = ["sigma", "filter_size"])]
    no_smoothing: bool,

    /// Pixel neighborhood used for graph edges and label fusion.
    #[arg(long, value_enum)]
    connectivity: Option<ConnectivityArg>,

    /// Write segment count and sizes to this text file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the label visualization to this image file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Color segments randomly using this seed instead of the fixed palette.
    #[arg(long, value_name = "SEED")]
    random_colors: Option<u64>,

    /// Log level filter, overridden by RUST_LOG.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write rotating log files to this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConnectivityArg {
    Four,
    Eight,
}

impl From<ConnectivityArg> for Connectivity {
    fn from(value: ConnectivityArg) -> Self {
        match value {
            ConnectivityArg::Four => Connectivity::Four,
            ConnectivityArg::Eight => Connectivity::Eight,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with the command-line overrides applied.
    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_yaml_file(path)?,
            None => Config::default(),
        };

        if let Some(k) = self.k {
            config.k = k;
        }
        if self.no_smoothing {
            config.smoothing = None;
        } else if self.sigma.is_some() || self.filter_size.is_some() {
            let mut smoothing = config.smoothing.unwrap_or_default();
            if let Some(sigma) = self.sigma {
                smoothing.sigma = sigma;
            }
            if let Some(filter_size) = self.filter_size {
                smoothing.filter_size = filter_size;
            }
            config.smoothing = Some(smoothing);
        }
        if let Some(connectivity) = self.connectivity {
            config.connectivity = connectivity.into();
        }
        if let Some(seed) = self.random_colors {
            config.palette = Palette::Random { seed };
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::log_setup::setup_logging(&cli.log_level, cli.log_dir.as_deref());

    let config = cli.build_config().context("Invalid configuration")?;
    tracing::debug!(?config, "Configuration");

    let image = PixelMatrix::open(&cli.input)?;
    tracing::info!(
        path = %cli.input.display(),
        width = image.width(),
        height = image.height(),
        "Loaded image"
    );

    let mut segmenter = Segmenter::new(config)?;
    segmenter.segment(&image)?;

    let sizes = segmenter.segment_sizes();
    println!("{}", segmenter.num_segments());
    for size in sizes {
        println!("{size}");
    }

    if let Some(report) = &cli.report {
        segmentation::output::write_report(report, sizes)?;
        tracing::info!(path = %report.display(), "Wrote report");
    }

    if let Some(output) = &cli.output {
        let result = segmenter.result().context("Segmentation produced no result")?;
        segmentation::output::save_visualization(
            output,
            result.labels(),
            segmenter.config().palette,
        )?;
        tracing::info!(path = %output.display(), "Wrote visualization");
    }

    Ok(())
}
