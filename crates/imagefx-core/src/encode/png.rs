//! PNG encoding for display and download.
//!
//! Results are served as real PNG files so the downloaded `*.png` opens in any
//! viewer. Both single-channel (L8) and RGB8 buffers are supported.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;
use thiserror::Error;

use crate::decode::SourceImage;
use crate::filters::FilterResult;
use crate::Channels;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a pixel buffer to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - Row-major pixel data, `channels.count()` bytes per pixel
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - Layout of `pixels`
///
/// # Errors
///
/// Returns an error if the dimensions are zero, the buffer length does not
/// match, or the encoder fails.
pub fn encode_png(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: Channels,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * channels.count();
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let color = match channels {
        Channels::Gray => ExtendedColorType::L8,
        Channels::Rgb => ExtendedColorType::Rgb8,
    };

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode an effect result to PNG.
pub fn encode_result(result: &FilterResult) -> Result<Vec<u8>, EncodeError> {
    encode_png(
        result.pixels(),
        result.width(),
        result.height(),
        result.channels(),
    )
}

/// Encode the normalized source image to PNG (for the "original" preview).
pub fn encode_source(source: &SourceImage) -> Result<Vec<u8>, EncodeError> {
    encode_png(
        source.pixels(),
        source.width(),
        source.height(),
        Channels::Rgb,
    )
}
