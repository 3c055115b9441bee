//! Image encoding for imagefx.
//!
//! This module provides functionality for:
//! - Encoding effect results and the normalized source to PNG
//!
//! All operations are synchronous and single-threaded within WASM.
//!
//! # Examples
//!
//! ```ignore
//! use imagefx_core::{encode::encode_png, Channels};
//!
//! let pixels = vec![128u8; 100 * 100]; // Gray image
//! let png_bytes = encode_png(&pixels, 100, 100, Channels::Gray).unwrap();
//! println!("Encoded {} bytes", png_bytes.len());
//! ```

mod png;

pub use png::{encode_png, encode_result, encode_source, EncodeError};
