//! RGB pixel matrix consumed by the segmentation pipeline.

use std::path::Path;

use common::Buffer2;

use crate::error::{Error, Result};
use crate::graph::GridContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    #[inline]
    pub fn channel(self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Non-empty, rectangular grid of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMatrix {
    pixels: Buffer2<Rgb>,
}

impl PixelMatrix {
    pub fn new(pixels: Buffer2<Rgb>) -> Result<Self> {
        if pixels.is_empty() {
            return Err(Error::EmptyImage {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        Ok(Self { pixels })
    }

    /// Builds a matrix from rows of pixels; every row must have the same length.
    pub fn from_rows<R: AsRef<[Rgb]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }

        let mut pixels = Vec::with_capacity(width * height);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(Error::RaggedRows {
                    row,
                    expected: width,
                    actual: values.len(),
                });
            }
            pixels.extend_from_slice(values);
        }

        Self::new(Buffer2::new(width, height, pixels))
    }

    /// Builds a gray image where all three channels carry the same intensity.
    pub fn from_gray_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let rgb_rows: Vec<Vec<Rgb>> = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|&v| Rgb::gray(v)).collect())
            .collect();
        Self::from_rows(&rgb_rows)
    }

    pub fn from_fn(
        width: usize,
        height: usize,
        f: impl FnMut(usize, usize) -> Rgb,
    ) -> Result<Self> {
        Self::new(Buffer2::from_fn(width, height, f))
    }

    pub fn from_rgb_image(image: &image::RgbImage) -> Result<Self> {
        Self::from_fn(
            image.width() as usize,
            image.height() as usize,
            |row, col| {
                let [red, green, blue] = image.get_pixel(col as u32, row as u32).0;
                Rgb::new(red, green, blue)
            },
        )
    }

    /// Decodes any format the `image` crate was built with.
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_rgb_image(&decoded.to_rgb8())
    }

    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            let px = self.pixels[(y as usize, x as usize)];
            image::Rgb([px.red, px.green, px.blue])
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Rgb {
        *self.pixels.get(row, col)
    }

    pub fn pixels(&self) -> &Buffer2<Rgb> {
        &self.pixels
    }

    pub fn grid(&self) -> GridContext {
        GridContext::new(self.width(), self.height())
    }

    /// Extracts one channel as an intensity matrix.
    pub fn channel(&self, channel: Channel) -> Buffer2<u8> {
        self.pixels.map(|px| px.channel(channel))
    }
}
