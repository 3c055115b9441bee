//! Image loading pipeline for imagefx.
//!
//! This module turns an uploaded byte stream into the session's
//! [`SourceImage`]:
//! - Recognizing the container (JPEG or PNG only) from its magic bytes
//! - Decoding to RGB8 with the `image` crate
//! - Applying the EXIF orientation tag
//! - Stretching to the fixed canvas (1080x720 unless configured otherwise)
//!
//! # Examples
//!
//! ```ignore
//! use imagefx_core::decode::load;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let source = load(&bytes).unwrap();
//! assert_eq!((source.width(), source.height()), (1080, 720));
//! ```

mod canvas;
mod load;
mod types;

pub use canvas::resize;
pub use load::{
    decode_image, extract_orientation, load, load_with_options, sniff_format, LoadOptions,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};
pub use types::{ContainerFormat, DecodeError, FilterType, Orientation, SourceImage};
