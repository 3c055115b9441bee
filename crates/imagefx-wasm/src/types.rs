//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core imagefx
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use imagefx_core::{Channels, Effect, FilterResult, SourceImage};
use wasm_bindgen::prelude::*;

/// A pixel grid handed to JavaScript for display.
///
/// Wraps either the normalized source (3 channels) or an effect result
/// (1 or 3 channels).
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `rgba_pixels()`
/// copy into a JavaScript `Uint8Array`. Each handle owns its own copy of the
/// grid (up to 2.3 MB on the default canvas); call `free()` once done with it,
/// since the session keeps its own cached result.
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    channels: Channels,
    effect: Option<Effect>,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel: 1 for grayscale and edge maps, 3 for color
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.channels.count() as u8
    }

    /// Effect name (`grayscale`, `blur`, `edges`), or undefined for the source
    #[wasm_bindgen(getter)]
    pub fn effect(&self) -> Option<String> {
        self.effect.map(|e| e.to_string())
    }

    /// Caption to render under the image
    #[wasm_bindgen(getter)]
    pub fn caption(&self) -> String {
        match self.effect {
            Some(effect) => effect.caption().to_string(),
            None => format!("Resized Image ({}x{} pixels)", self.width, self.height),
        }
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns the raw pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data suitable for `new ImageData(...)`.
    ///
    /// Gray values are replicated into R, G and B; alpha is always 255.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity((self.width as usize) * (self.height as usize) * 4);
        match self.channels {
            Channels::Gray => {
                for &v in &self.pixels {
                    rgba.extend_from_slice(&[v, v, v, 255]);
                }
            }
            Channels::Rgb => {
                for px in self.pixels.chunks_exact(3) {
                    rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
            }
        }
        rgba
    }
}

impl JsImage {
    pub(crate) fn from_source(source: &SourceImage) -> Self {
        Self {
            width: source.width(),
            height: source.height(),
            channels: Channels::Rgb,
            effect: None,
            pixels: source.pixels().to_vec(),
        }
    }

    pub(crate) fn from_result(result: &FilterResult) -> Self {
        Self {
            width: result.width(),
            height: result.height(),
            channels: result.channels(),
            effect: Some(result.effect()),
            pixels: result.pixels().to_vec(),
        }
    }
}

/// Parse an effect name coming from the page.
pub(crate) fn effect_from_str(name: &str) -> Result<Effect, String> {
    Effect::from_name(name).ok_or_else(|| format!("Unknown effect '{}'", name))
}
