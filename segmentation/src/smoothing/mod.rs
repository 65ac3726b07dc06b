//! Gaussian pre-smoothing.
//!
//! Separable convolution: rows first, then columns, all three channels in one
//! pass. Samples outside the image are clamped to the nearest edge pixel.


use rayon::prelude::*;

use common::Buffer2;

use crate::config::SmoothingConfig;
use crate::error::Result;
use crate::image::{PixelMatrix, Rgb};

/// Rows handed to one rayon task.
const ROWS_PER_CHUNK: usize = 8;

/// Compute a normalized 1D Gaussian kernel with `filter_size` taps.
///
/// Even sizes are rounded up to the next odd value so the kernel has a center
/// tap. The kernel sums to 1.0.
pub fn gaussian_kernel_1d(sigma: f64, filter_size: usize) -> Result<Vec<f32>> {
    SmoothingConfig { sigma, filter_size }.validate()?;

    let radius = filter_size / 2;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..2 * radius + 1)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / two_sigma_sq).exp() as f32
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    Ok(kernel)
}

/// Blur `image` with a Gaussian of the given size and sigma.
///
/// Output has the same dimensions; channel values are rounded back to `u8`.
pub fn smooth(image: &PixelMatrix, filter_size: usize, sigma: f64) -> Result<PixelMatrix> {
    let kernel = gaussian_kernel_1d(sigma, filter_size)?;
    let width = image.width();
    let height = image.height();

    let input: Vec<[f32; 3]> = image
        .pixels()
        .iter()
        .map(|p| [p.red as f32, p.green as f32, p.blue as f32])
        .collect();

    let mut temp = vec![[0.0f32; 3]; width * height];
    convolve_rows(&input, &mut temp, width, &kernel);

    let mut output = vec![[0.0f32; 3]; width * height];
    convolve_cols(&temp, &mut output, width, height, &kernel);

    let pixels = output
        .into_iter()
        .map(|[r, g, b]| Rgb::new(to_u8(r), to_u8(g), to_u8(b)))
        .collect();
    PixelMatrix::new(Buffer2::new(width, height, pixels))
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn clamp_offset(pos: usize, tap: usize, radius: usize, len: usize) -> usize {
    (pos + tap).saturating_sub(radius).min(len - 1)
}

fn convolve_rows(input: &[[f32; 3]], output: &mut [[f32; 3]], width: usize, kernel: &[f32]) {
    let radius = kernel.len() / 2;

    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;

            for (local_y, out_row) in out_chunk.chunks_exact_mut(width).enumerate() {
                let y = y_start + local_y;
                let in_row = &input[y * width..(y + 1) * width];

                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut sum = [0.0f32; 3];
                    for (k, &kval) in kernel.iter().enumerate() {
                        let sample = in_row[clamp_offset(x, k, radius, width)];
                        for c in 0..3 {
                            sum[c] += sample[c] * kval;
                        }
                    }
                    *out = sum;
                }
            }
        });
}

fn convolve_cols(
    input: &[[f32; 3]],
    output: &mut [[f32; 3]],
    width: usize,
    height: usize,
    kernel: &[f32],
) {
    let radius = kernel.len() / 2;

    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;

            for (local_y, out_row) in out_chunk.chunks_exact_mut(width).enumerate() {
                let y = y_start + local_y;

                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut sum = [0.0f32; 3];
                    for (k, &kval) in kernel.iter().enumerate() {
                        let sy = clamp_offset(y, k, radius, height);
                        let sample = input[sy * width + x];
                        for c in 0..3 {
                            sum[c] += sample[c] * kval;
                        }
                    }
                    *out = sum;
                }
            }
        });
}
