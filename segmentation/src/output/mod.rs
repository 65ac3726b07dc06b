//! Text report and label visualization.

#[cfg(test)]
mod tests;

use std::fmt::Write as _;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Palette;
use crate::error::{Error, Result};
use crate::image::Rgb;
use crate::segment::LabelMap;

/// Colors cycled over labels by [`Palette::Fixed`].
pub const FIXED_COLORS: [Rgb; 6] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 255),
];

/// Segment count on the first line, then one size per line.
pub fn format_report(sizes: &[usize]) -> String {
    let mut report = String::with_capacity(8 * (sizes.len() + 1));
    let _ = writeln!(report, "{}", sizes.len());
    for size in sizes {
        let _ = writeln!(report, "{size}");
    }
    report
}

pub fn write_report(path: &Path, sizes: &[usize]) -> Result<()> {
    std::fs::write(path, format_report(sizes)).map_err(|source| Error::WriteReport {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), segments = sizes.len(), "Wrote report");
    Ok(())
}

/// One color per label.
pub fn label_colors(num_labels: usize, palette: Palette) -> Vec<Rgb> {
    match palette {
        Palette::Fixed => (0..num_labels)
            .map(|label| FIXED_COLORS[label % FIXED_COLORS.len()])
            .collect(),
        Palette::Random { seed } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..num_labels)
                .map(|_| Rgb::new(rng.random(), rng.random(), rng.random()))
                .collect()
        }
    }
}

/// Paints every pixel with the color of its label.
pub fn render_labels(labels: &LabelMap, palette: Palette) -> image::RgbImage {
    let colors = label_colors(labels.num_labels(), palette);
    let width = labels.width();

    image::RgbImage::from_fn(width as u32, labels.height() as u32, |x, y| {
        let color = colors[labels[y as usize * width + x as usize] as usize];
        image::Rgb([color.red, color.green, color.blue])
    })
}

/// Renders `labels` and writes the image; the format follows the extension.
pub fn save_visualization(path: &Path, labels: &LabelMap, palette: Palette) -> Result<()> {
    render_labels(labels, palette)
        .save(path)
        .map_err(|source| Error::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), labels = labels.num_labels(), "Saved visualization");
    Ok(())
}
