//! Upload loading: container sniffing, decoding, orientation and canvas fit.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, GenericImageView, ImageReader, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::canvas::resize;
use super::{ContainerFormat, DecodeError, FilterType, Orientation, SourceImage};

/// Width of the canvas every upload is stretched to.
pub const CANVAS_WIDTH: u32 = 1080;

/// Height of the canvas every upload is stretched to.
pub const CANVAS_HEIGHT: u32 = 720;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Options controlling how an upload becomes a `SourceImage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Target canvas width in pixels
    pub canvas_width: u32,
    /// Target canvas height in pixels
    pub canvas_height: u32,
    /// Interpolation used when stretching to the canvas
    pub filter: FilterType,
    /// Apply the EXIF orientation tag before stretching
    pub apply_orientation: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            filter: FilterType::default(),
            apply_orientation: true,
        }
    }
}

/// Identify the container from its leading magic bytes.
///
/// Only JPEG and PNG are recognized; everything else returns `None`.
pub fn sniff_format(bytes: &[u8]) -> Option<ContainerFormat> {
    if bytes.starts_with(PNG_MAGIC) {
        Some(ContainerFormat::Png)
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some(ContainerFormat::Jpeg)
    } else {
        None
    }
}

/// Decode JPEG or PNG bytes to RGB at native size.
///
/// Alpha is dropped and 16-bit samples are reduced to 8 bits.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are neither JPEG nor PNG.
/// Returns `DecodeError::CorruptedFile` if the container is truncated or damaged.
pub fn decode_image(
    bytes: &[u8],
    apply_orientation: bool,
) -> Result<(RgbImage, ContainerFormat), DecodeError> {
    let format = sniff_format(bytes).ok_or(DecodeError::InvalidFormat)?;

    let img = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if apply_orientation {
        orient(img, extract_orientation(bytes))
    } else {
        img
    };

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }
    Ok((img.into_rgb8(), format))
}

/// Load an upload onto the default 1080x720 canvas.
///
/// The image is stretched, not cropped, so the aspect ratio is not preserved.
pub fn load(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    load_with_options(bytes, &LoadOptions::default())
}

/// Load an upload onto the canvas described by `options`.
#[instrument(skip(bytes, options), fields(len = bytes.len()))]
pub fn load_with_options(bytes: &[u8], options: &LoadOptions) -> Result<SourceImage, DecodeError> {
    if options.canvas_width == 0 || options.canvas_height == 0 {
        return Err(DecodeError::InvalidDimensions {
            width: options.canvas_width,
            height: options.canvas_height,
        });
    }

    let (decoded, format) = decode_image(bytes, options.apply_orientation)?;
    let original = decoded.dimensions();
    debug!(?format, ?original, "Decoded upload");

    let canvas = resize(
        &decoded,
        options.canvas_width,
        options.canvas_height,
        options.filter,
    )?;
    info!(
        width = canvas.width(),
        height = canvas.height(),
        "Upload normalized to canvas"
    );

    Ok(SourceImage::from_canvas(canvas, format, original))
}

/// Read the EXIF orientation tag.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn orient(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
