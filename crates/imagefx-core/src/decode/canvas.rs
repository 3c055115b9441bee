//! Canvas normalization.
//!
//! Every upload is stretched to the session canvas regardless of its aspect
//! ratio. Nothing is cropped or letterboxed, so a 500x300 upload and a
//! 300x500 upload both end up 1080x720.

use image::imageops;
use image::RgbImage;

use super::{DecodeError, FilterType};

/// Stretch `image` to exactly `width` x `height`.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is
/// zero, or if the source itself is empty.
pub fn resize(
    image: &RgbImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: src_w,
            height: src_h,
        });
    }

    if (src_w, src_h) == (width, height) {
        return Ok(image.clone());
    }
    Ok(imageops::resize(image, width, height, filter.to_image_filter()))
}
