//! The three effects: grayscale, Gaussian blur and edge detection.
//!
//! Each effect is a pure function of the session's [`SourceImage`] and its
//! parameters. None of them accepts a [`FilterResult`] as input, so results
//! cannot be chained: every result is derived from the original upload.
//!
//! [`SourceImage`]: crate::decode::SourceImage

mod blur;
mod edges;
mod grayscale;
mod params;

pub use blur::{blur, blur_with, gaussian_kernel, sigma_for_kernel};
pub use edges::{canny, detect_edges, detect_edges_with};
pub use grayscale::{to_gray_image, to_grayscale};
pub use params::{BlurParams, ControlRange, ControlRanges, EdgeParams};

use thiserror::Error;

use crate::{Channels, Effect};

/// Errors raised by filter parameters.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    /// Gaussian kernels must have a positive odd side length.
    #[error("Invalid kernel size {size}: must be a positive odd integer")]
    InvalidKernel { size: u32 },

    /// Edge thresholds must be finite and non-negative.
    #[error("Invalid edge thresholds ({low}, {high}): must be finite and non-negative")]
    InvalidThreshold { low: f32, high: f32 },
}

/// A pixel grid produced by one effect.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    effect: Effect,
    channels: Channels,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FilterResult {
    /// Create a result from raw pixel data.
    pub fn new(
        effect: Effect,
        channels: Channels,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * channels.count(),
            "Pixel buffer size mismatch"
        );
        Self {
            effect,
            channels,
            width,
            height,
            pixels,
        }
    }

    pub(crate) fn from_gray_image(effect: Effect, img: image::GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(effect, Channels::Gray, width, height, img.into_raw())
    }

    /// Effect that produced this result.
    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel data, `channels().count()` bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Convert to an image::DynamicImage (Luma8 or Rgb8).
    pub fn to_dynamic_image(&self) -> Option<image::DynamicImage> {
        let pixels = self.pixels.clone();
        match self.channels {
            Channels::Gray => image::GrayImage::from_raw(self.width, self.height, pixels)
                .map(image::DynamicImage::ImageLuma8),
            Channels::Rgb => image::RgbImage::from_raw(self.width, self.height, pixels)
                .map(image::DynamicImage::ImageRgb8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_result_accessors() {
        let result = FilterResult::new(Effect::Blur, Channels::Rgb, 4, 3, vec![0u8; 36]);
        assert_eq!(result.effect(), Effect::Blur);
        assert_eq!(result.channels(), Channels::Rgb);
        assert_eq!((result.width(), result.height()), (4, 3));
        assert_eq!(result.byte_size(), 36);
    }

    #[test]
    fn test_to_dynamic_image() {
        let gray = FilterResult::new(Effect::Edges, Channels::Gray, 2, 2, vec![0, 255, 255, 0]);
        let img = gray.to_dynamic_image().unwrap();
        assert_eq!(img.color(), image::ColorType::L8);

        let rgb = FilterResult::new(Effect::Blur, Channels::Rgb, 1, 1, vec![1, 2, 3]);
        let img = rgb.to_dynamic_image().unwrap();
        assert_eq!(img.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_filter_error_display() {
        assert_eq!(
            FilterError::InvalidKernel { size: 4 }.to_string(),
            "Invalid kernel size 4: must be a positive odd integer"
        );
    }
}
