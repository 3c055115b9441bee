//! Luma calculation using ITU-R BT.601 coefficients.
//!
//! This is the weighting used by the grayscale effect and by the edge
//! detector's intensity plane. The u8 path uses 14-bit fixed point so results
//! are exact and identical on every target, including wasm32.

/// ITU-R BT.601 coefficient for red channel in luma calculation.
pub const LUMA_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luma calculation.
pub const LUMA_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luma calculation.
pub const LUMA_B: f32 = 0.114;

const FIXED_SHIFT: u32 = 14;
const FIXED_R: u32 = 4899; // round(0.299 * 2^14)
const FIXED_G: u32 = 9617; // round(0.587 * 2^14)
const FIXED_B: u32 = 1868; // round(0.114 * 2^14)

/// Calculate luma from normalized RGB values (0.0 to 1.0).
///
/// # Arguments
/// * `r` - Red channel value (0.0 to 1.0)
/// * `g` - Green channel value (0.0 to 1.0)
/// * `b` - Blue channel value (0.0 to 1.0)
///
/// # Returns
/// Luma value (0.0 to 1.0)
#[inline]
pub fn calculate_luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Calculate luma from u8 RGB values (0 to 255).
///
/// The fixed-point weights sum to exactly `2^14`, so equal channels map to
/// the same gray value.
#[inline]
pub fn calculate_luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let acc = FIXED_R * r as u32 + FIXED_G * g as u32 + FIXED_B * b as u32;
    ((acc + (1 << (FIXED_SHIFT - 1))) >> FIXED_SHIFT) as u8
}

/// Reduce an interleaved RGB buffer to one luma byte per pixel.
pub fn rgb_to_luma(pixels: &[u8]) -> Vec<u8> {
    pixels
        .chunks_exact(3)
        .map(|px| calculate_luma_u8(px[0], px[1], px[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMA_R + LUMA_G + LUMA_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
        assert_eq!(FIXED_R + FIXED_G + FIXED_B, 1 << FIXED_SHIFT);
    }

    #[test]
    fn test_luma_pure_white_and_black() {
        assert_eq!(calculate_luma_u8(255, 255, 255), 255);
        assert_eq!(calculate_luma_u8(0, 0, 0), 0);
        assert!((calculate_luma(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_luma_gray_preserves_value() {
        for v in 0..=255u8 {
            assert_eq!(calculate_luma_u8(v, v, v), v);
        }
    }

    #[test]
    fn test_luma_primaries() {
        // 0.299 * 255 ≈ 76.2
        assert_eq!(calculate_luma_u8(255, 0, 0), 76);
        // 0.587 * 255 ≈ 149.7
        assert_eq!(calculate_luma_u8(0, 255, 0), 150);
        // 0.114 * 255 ≈ 29.1
        assert_eq!(calculate_luma_u8(0, 0, 255), 29);
    }

    #[test]
    fn test_f32_matches_u8() {
        for r in [0u8, 64, 128, 192, 255] {
            for g in [0u8, 64, 128, 192, 255] {
                for b in [0u8, 64, 128, 192, 255] {
                    let lum_f32 =
                        calculate_luma(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                    let expected = (lum_f32 * 255.0).round() as i32;
                    let actual = calculate_luma_u8(r, g, b) as i32;
                    assert!(
                        (actual - expected).abs() <= 1,
                        "f32 and u8 luma should match for ({}, {}, {})",
                        r,
                        g,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_rgb_to_luma_length() {
        let pixels = vec![10u8, 20, 30, 40, 50, 60];
        let luma = rgb_to_luma(&pixels);
        assert_eq!(luma.len(), 2);
    }
}
