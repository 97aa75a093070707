use anyhow::Context;
use glam::Vec3;
use log::info;
use std::{ops::Range, path::Path};

pub const COLOR_CHANNELS: usize = 3;

/// Byte packed RGB pixels, row major, row 0 at the bottom.
///
/// The width is always a multiple of 4 so every row is 4-byte aligned when
/// handed to a texture upload.
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Rounds a width up to the next multiple of 4
pub fn padded_width(width: usize) -> usize {
    (width + 3) / 4 * 4
}

/// Converts a linear color to 8 bit channels, clamping to [0, 1]
pub fn encode(color: Vec3) -> [u8; COLOR_CHANNELS] {
    let channel = |c: f32| (c.max(0.0).min(1.0) * 255.0) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut buffer = Self::default();
        buffer.resize(width, height);
        buffer
    }

    /// Reallocates the buffer for a new output size. Old contents are dropped.
    pub fn resize(&mut self, width: usize, height: usize) {
        let width = padded_width(width);
        self.width = width;
        self.height = height;
        self.data = vec![0u8; width * height * COLOR_CHANNELS];

        info!("Frame buffer resized to {}x{}", width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width * COLOR_CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_CHANNELS] {
        let i = (y * self.width + x) * COLOR_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Splits the pixel store into one mutable slice per row band.
    ///
    /// The bands must be contiguous, in order and start at row 0.
    pub fn split_bands_mut(&mut self, bands: &[Range<usize>]) -> Vec<&mut [u8]> {
        let stride = self.stride();
        let mut rest: &mut [u8] = &mut self.data;
        let mut slices = Vec::with_capacity(bands.len());

        for rows in bands {
            let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * stride);
            slices.push(band);
            rest = tail;
        }

        slices
    }

    /// Writes the buffer as a PNG, flipping it so row 0 ends up at the bottom
    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        let mut flipped = Vec::with_capacity(self.data.len());
        if self.stride() > 0 {
            for row in self.data.chunks(self.stride()).rev() {
                flipped.extend_from_slice(row);
            }
        }

        image::save_buffer(
            path,
            &flipped,
            self.width as u32,
            self.height as u32,
            image::ColorType::Rgb8,
        )
        .with_context(|| format!("Failed to save image to {:?}", path))?;

        info!("Saved {}x{} image to {:?}", self.width, self.height, path);
        Ok(())
    }
}
