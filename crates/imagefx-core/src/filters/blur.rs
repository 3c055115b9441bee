//! Gaussian blur effect.
//!
//! ## Kernel
//! The kernel side is chosen by the user and sigma is derived from it
//! (the "sigma = 0" convention):
//!
//! `sigma = 0.3 * ((k - 1) * 0.5 - 1) + 0.8`
//!
//! Sizes 1, 3, 5 and 7 use the fixed binomial-like tables instead.
//!
//! ## Borders
//! Samples outside the image reflect without repeating the edge pixel:
//! `dcb|abcd|cba`.

use tracing::debug;

use super::{BlurParams, FilterError, FilterResult};
use crate::decode::SourceImage;
use crate::{Channels, Effect};

const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Standard deviation derived from a kernel size.
pub fn sigma_for_kernel(kernel_size: u32) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Build the normalized 1-D Gaussian kernel of the given odd size.
///
/// # Errors
///
/// Returns `FilterError::InvalidKernel` if `size` is zero or even.
pub fn gaussian_kernel(size: u32) -> Result<Vec<f32>, FilterError> {
    BlurParams::new(size).validate()?;

    if let Some(table) = SMALL_KERNELS.get((size / 2) as usize) {
        return Ok(table.to_vec());
    }

    let sigma = sigma_for_kernel(size);
    let scale = -0.5 / (sigma * sigma);
    let center = (size / 2) as f64;
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    Ok(weights.into_iter().map(|w| (w / sum) as f32).collect())
}

/// Blur the source with a square Gaussian window of side `kernel_size`.
///
/// The result keeps all three color channels.
///
/// # Errors
///
/// Returns `FilterError::InvalidKernel` if `kernel_size` is zero or even.
pub fn blur(source: &SourceImage, kernel_size: u32) -> Result<FilterResult, FilterError> {
    blur_with(source, &BlurParams::new(kernel_size))
}

/// Blur using a parameter struct.
pub fn blur_with(source: &SourceImage, params: &BlurParams) -> Result<FilterResult, FilterError> {
    let kernel = gaussian_kernel(params.kernel_size)?;
    let width = source.width() as usize;
    let height = source.height() as usize;
    debug!(
        kernel_size = params.kernel_size,
        sigma = sigma_for_kernel(params.kernel_size),
        "Applying Gaussian blur"
    );

    let horizontal = convolve_rows(source.pixels(), width, height, &kernel);
    let pixels = convolve_columns(&horizontal, width, height, &kernel);

    Ok(FilterResult::new(
        Effect::Blur,
        Channels::Rgb,
        source.width(),
        source.height(),
        pixels,
    ))
}

/// Horizontal pass: u8 RGB in, f32 RGB out.
fn convolve_rows(pixels: &[u8], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![0.0f32; width * height * 3];

    for y in 0..height {
        let row = &pixels[y * width * 3..(y + 1) * width * 3];
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = reflect(x as isize + k as isize - radius, width);
                acc[0] += weight * row[sx * 3] as f32;
                acc[1] += weight * row[sx * 3 + 1] as f32;
                acc[2] += weight * row[sx * 3 + 2] as f32;
            }
            let idx = (y * width + x) * 3;
            out[idx..idx + 3].copy_from_slice(&acc);
        }
    }

    out
}

/// Vertical pass: f32 RGB in, rounded u8 RGB out.
fn convolve_columns(plane: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<u8> {
    let radius = (kernel.len() / 2) as isize;
    let mut out = vec![0u8; width * height * 3];

    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = reflect(y as isize + k as isize - radius, height);
                let idx = (sy * width + x) * 3;
                acc[0] += weight * plane[idx];
                acc[1] += weight * plane[idx + 1];
                acc[2] += weight * plane[idx + 2];
            }
            let idx = (y * width + x) * 3;
            for c in 0..3 {
                out[idx + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

/// Map an out-of-range index back inside `0..len` by mirror reflection
/// around the edge pixels (the edge pixel itself is not repeated).
fn reflect(mut i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn odd_kernel() -> impl Strategy<Value = u32> {
        (1u32..=7).prop_map(|k| k * 2 + 1)
    }

    proptest! {
        /// Property: blurred values stay within the source's value range.
        #[test]
        fn prop_blur_within_source_range(
            (w, h, pixels) in (1u32..=16, 1u32..=16).prop_flat_map(|(w, h)| {
                let len = (w * h * 3) as usize;
                (Just(w), Just(h), prop::collection::vec(any::<u8>(), len..=len))
            }),
            kernel in odd_kernel(),
        ) {
            let src = SourceImage::from_rgb(w, h, pixels).unwrap();
            let lo = *src.pixels().iter().min().unwrap();
            let hi = *src.pixels().iter().max().unwrap();

            let result = blur(&src, kernel).unwrap();
            for &p in result.pixels() {
                prop_assert!(p >= lo && p <= hi);
            }
        }

        /// Property: even kernels are always rejected.
        #[test]
        fn prop_even_kernel_rejected(half in 0u32..=32) {
            let src = SourceImage::from_rgb(2, 2, vec![0u8; 12]).unwrap();
            let size = half * 2;
            prop_assert_eq!(blur(&src, size).unwrap_err(), FilterError::InvalidKernel { size });
        }
    }
}
