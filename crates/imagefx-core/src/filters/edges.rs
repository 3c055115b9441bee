//! Edge detection effect (two-threshold gradient detector).
//!
//! ## Algorithm
//! 1. Luma plane of the source (same weights as the grayscale effect)
//! 2. 3x3 Sobel gradients, borders replicate the edge pixel
//! 3. L1 magnitude `|gx| + |gy|`
//! 4. Non-maximum suppression along the gradient direction, quantized to
//!    horizontal, vertical or one of the two diagonals
//! 5. Hysteresis: ridge pixels above `high` seed edges; ridge pixels above
//!    `low` survive only when 8-connected to a seed
//!
//! The output is a single-channel map holding only 0 and 255.

use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use tracing::debug;

use super::grayscale::to_gray_image;
use super::{EdgeParams, FilterError, FilterResult};
use crate::decode::SourceImage;
use crate::Effect;

/// tan(22.5°)
const TAN_22_5: f32 = 0.414_213_57;
/// tan(67.5°)
const TAN_67_5: f32 = 2.414_213_6;

const NONE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Detect edges in the source.
///
/// Thresholds may be given in either order; the larger one is used as the
/// strong threshold.
///
/// # Errors
///
/// Returns `FilterError::InvalidThreshold` for NaN, infinite or negative
/// thresholds.
pub fn detect_edges(
    source: &SourceImage,
    low: f32,
    high: f32,
) -> Result<FilterResult, FilterError> {
    detect_edges_with(source, &EdgeParams::new(low, high))
}

/// Detect edges using a parameter struct.
pub fn detect_edges_with(
    source: &SourceImage,
    params: &EdgeParams,
) -> Result<FilterResult, FilterError> {
    let (weak, strong) = params.normalized()?;
    if params.low > params.high {
        debug!(
            low = params.low,
            high = params.high,
            "Edge thresholds given in descending order, swapping"
        );
    }

    let gray = to_gray_image(source);
    let edges = canny(&gray, weak, strong);
    Ok(FilterResult::from_gray_image(Effect::Edges, edges))
}

/// Run the detector on a luma image with `low <= high`.
pub fn canny(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);

    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let gx = gx.as_raw();
    let gy = gy.as_raw();

    let magnitude: Vec<i32> = gx
        .iter()
        .zip(gy.iter())
        .map(|(&dx, &dy)| (dx as i32).abs() + (dy as i32).abs())
        .collect();
    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    let mut state = vec![NONE; w * h];
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let m = magnitude[idx];
            if m as f32 <= low {
                continue;
            }

            let dx = gx[idx] as i32;
            let dy = gy[idx] as i32;
            let ax = dx.abs() as f32;
            let ay = dy.abs() as f32;
            let (xi, yi) = (x as isize, y as isize);

            let is_ridge = if ay < ax * TAN_22_5 {
                // Gradient is mostly horizontal
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                // Gradient is mostly vertical
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                // Diagonal: same signs point down-right, opposite signs down-left
                let s = if (dx < 0) != (dy < 0) { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };

            if !is_ridge {
                continue;
            }
            if m as f32 > high {
                state[idx] = STRONG;
                stack.push(idx);
            } else {
                state[idx] = WEAK;
            }
        }
    }

    // Hysteresis: grow from strong seeds through weak ridge pixels
    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % w) as isize, (idx / w) as isize);
        for ny in (y - 1)..=(y + 1) {
            for nx in (x - 1)..=(x + 1) {
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if state[n] == WEAK {
                    state[n] = STRONG;
                    stack.push(n);
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        if state[y as usize * w + x as usize] == STRONG {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn source_strategy() -> impl Strategy<Value = SourceImage> {
        (4u32..=24, 4u32..=24, any::<u64>()).prop_map(|(w, h, seed)| {
            // Blocky pseudo-random pattern so there are real gradients to find
            let mut pixels = Vec::with_capacity((w * h * 3) as usize);
            for y in 0..h {
                for x in 0..w {
                    let cell = ((x / 3) as u64) * 31 + ((y / 3) as u64) * 17;
                    let v = (seed.wrapping_mul(cell + 1).rotate_left(13) % 256) as u8;
                    pixels.extend_from_slice(&[v, v, v]);
                }
            }
            SourceImage::from_rgb(w, h, pixels).unwrap()
        })
    }

    fn count(result: &FilterResult) -> usize {
        result.pixels().iter().filter(|&&p| p == 255).count()
    }

    proptest! {
        /// Property: raising low with high fixed never adds edge pixels.
        #[test]
        fn prop_raising_low_never_adds_edges(
            src in source_strategy(),
            low in 50u32..=200,
            bump in 1u32..=100,
            high in 150u32..=300,
        ) {
            let before = detect_edges(&src, low as f32, high as f32).unwrap();
            let after = detect_edges(&src, (low + bump) as f32, high as f32).unwrap();
            prop_assert!(count(&after) <= count(&before));
        }

        /// Property: threshold order does not matter.
        #[test]
        fn prop_threshold_order_irrelevant(
            src in source_strategy(),
            a in 50u32..=300,
            b in 50u32..=300,
        ) {
            let ab = detect_edges(&src, a as f32, b as f32).unwrap();
            let ba = detect_edges(&src, b as f32, a as f32).unwrap();
            prop_assert_eq!(ab.pixels(), ba.pixels());
        }

        /// Property: output is always binary and the same size as the source.
        #[test]
        fn prop_output_binary(src in source_strategy()) {
            let result = detect_edges(&src, 100.0, 200.0).unwrap();
            prop_assert_eq!(result.byte_size(), (src.width() * src.height()) as usize);
            prop_assert!(result.pixels().iter().all(|&p| p == 0 || p == 255));
        }
    }
}
