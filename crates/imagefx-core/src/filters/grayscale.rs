//! Grayscale effect.

use image::GrayImage;

use super::FilterResult;
use crate::decode::SourceImage;
use crate::luminance::rgb_to_luma;
use crate::Effect;

/// Convert the source to a single-channel luma image.
///
/// Uses BT.601 weights in fixed point, so the same source always yields a
/// byte-identical result.
pub fn to_grayscale(source: &SourceImage) -> FilterResult {
    FilterResult::from_gray_image(Effect::Grayscale, to_gray_image(source))
}

/// Luma plane of the source as an image::GrayImage.
pub fn to_gray_image(source: &SourceImage) -> GrayImage {
    let luma = rgb_to_luma(source.pixels());
    // rgb_to_luma yields exactly one byte per source pixel
    GrayImage::from_vec(source.width(), source.height(), luma)
        .unwrap_or_else(|| GrayImage::new(source.width(), source.height()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn source_strategy() -> impl Strategy<Value = SourceImage> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            let len = (w * h * 3) as usize;
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| SourceImage::from_rgb(w, h, pixels).unwrap())
        })
    }

    proptest! {
        /// Property: same input always produces byte-identical output.
        #[test]
        fn prop_grayscale_deterministic(src in source_strategy()) {
            let a = to_grayscale(&src);
            let b = to_grayscale(&src);
            prop_assert_eq!(a.pixels(), b.pixels());
        }

        /// Property: output has one byte per source pixel.
        #[test]
        fn prop_grayscale_one_byte_per_pixel(src in source_strategy()) {
            let result = to_grayscale(&src);
            prop_assert_eq!(result.byte_size(), (src.width() * src.height()) as usize);
        }

        /// Property: gray lies between the darkest and brightest channel.
        #[test]
        fn prop_grayscale_within_channel_bounds(src in source_strategy()) {
            let result = to_grayscale(&src);
            for (px, &gray) in src.pixels().chunks_exact(3).zip(result.pixels()) {
                let lo = *px.iter().min().unwrap();
                let hi = *px.iter().max().unwrap();
                prop_assert!(gray >= lo && gray <= hi);
            }
        }
    }
}
