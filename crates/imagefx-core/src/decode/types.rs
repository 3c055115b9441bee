//! Types shared by the upload pipeline: errors, resampling filters,
//! container formats, orientation and the normalized source image.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an upload could not become a source image.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a JPEG or PNG container.
    #[error("Unsupported image: only JPEG and PNG can be loaded")]
    InvalidFormat,

    /// The container was recognized but could not be decoded.
    #[error("Could not decode image: {0}")]
    CorruptedFile(String),

    /// A zero-sized image or canvas was requested.
    #[error("Image has no pixels ({width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Resampling filter used when stretching onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Pixel replication; blocky when upscaling.
    Nearest,
    /// Linear (triangle) weights.
    Bilinear,
    /// Bicubic (Catmull-Rom) interpolation, the usual default for photo resizing.
    #[default]
    Bicubic,
    /// Windowed sinc over three lobes; sharpest, slowest.
    Lanczos3,
}

impl FilterType {
    /// The matching `image::imageops` filter.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Bicubic => image::imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Image containers accepted by the upload surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFormat {
    Jpeg,
    Png,
}

impl ContainerFormat {
    /// MIME type for this container.
    pub fn mime_type(self) -> &'static str {
        match self {
            ContainerFormat::Jpeg => "image/jpeg",
            ContainerFormat::Png => "image/png",
        }
    }

    /// Resolve a declared upload type.
    ///
    /// Accepts either a MIME type (`image/jpeg`, `image/png`) or a file name
    /// whose extension is `jpg`, `jpeg` or `png`. Matching is case-insensitive.
    pub fn from_declared(declared: &str) -> Option<ContainerFormat> {
        let declared = declared.trim().to_ascii_lowercase();
        match declared.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => return Some(ContainerFormat::Jpeg),
            "image/png" => return Some(ContainerFormat::Png),
            _ => {}
        }
        let (_, extension) = declared.rsplit_once('.')?;
        match extension {
            "jpg" | "jpeg" => Some(ContainerFormat::Jpeg),
            "png" => Some(ContainerFormat::Png),
            _ => None,
        }
    }

    pub(crate) fn to_image_format(self) -> image::ImageFormat {
        match self {
            ContainerFormat::Jpeg => image::ImageFormat::Jpeg,
            ContainerFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// EXIF `Orientation` tag values. Unknown values read as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// The normalized image a session works from.
///
/// Always RGB8 at the session's canvas size (1080x720 by default). Fields are
/// private so the grid cannot change after loading; every effect reads it
/// through a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    format: ContainerFormat,
    original_width: u32,
    original_height: u32,
}

impl SourceImage {
    pub(crate) fn from_canvas(
        canvas: image::RgbImage,
        format: ContainerFormat,
        (original_width, original_height): (u32, u32),
    ) -> Self {
        let (width, height) = canvas.dimensions();
        Self {
            width,
            height,
            pixels: canvas.into_raw(),
            format,
            original_width,
            original_height,
        }
    }

    /// Build a source image directly from RGB pixels, bypassing decoding.
    ///
    /// Returns `None` if the buffer length is not `width * height * 3`.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
            format: ContainerFormat::Png,
            original_width: width,
            original_height: height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Container the image was decoded from.
    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Dimensions before normalization to the canvas.
    pub fn original_dimensions(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }

    /// Borrow the pixels as an image::RgbImage view.
    pub fn as_rgb_image(&self) -> Option<image::ImageBuffer<image::Rgb<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.pixels.as_slice())
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Bicubic.to_image_filter(),
            image::imageops::FilterType::CatmullRom
        ));
        assert_eq!(FilterType::default(), FilterType::Bicubic);
    }

    #[test]
    fn test_container_from_mime() {
        assert_eq!(
            ContainerFormat::from_declared("image/jpeg"),
            Some(ContainerFormat::Jpeg)
        );
        assert_eq!(
            ContainerFormat::from_declared("IMAGE/PNG"),
            Some(ContainerFormat::Png)
        );
        assert_eq!(ContainerFormat::from_declared("image/gif"), None);
        assert_eq!(ContainerFormat::from_declared("text/plain"), None);
    }

    #[test]
    fn test_container_from_file_name() {
        assert_eq!(
            ContainerFormat::from_declared("holiday.JPG"),
            Some(ContainerFormat::Jpeg)
        );
        assert_eq!(
            ContainerFormat::from_declared("scan.final.jpeg"),
            Some(ContainerFormat::Jpeg)
        );
        assert_eq!(
            ContainerFormat::from_declared("notes.png"),
            Some(ContainerFormat::Png)
        );
        assert_eq!(ContainerFormat::from_declared("notes.txt"), None);
        assert_eq!(ContainerFormat::from_declared("png"), None);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_source_image_from_rgb() {
        let img = SourceImage::from_rgb(4, 2, vec![7u8; 4 * 2 * 3]).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 2);
        assert_eq!(img.byte_size(), 24);
        assert_eq!(img.original_dimensions(), (4, 2));
        assert!(img.as_rgb_image().is_some());
    }

    #[test]
    fn test_source_image_rejects_bad_buffer() {
        assert!(SourceImage::from_rgb(4, 2, vec![0u8; 10]).is_none());
        assert!(SourceImage::from_rgb(0, 2, vec![]).is_none());
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "Unsupported image: only JPEG and PNG can be loaded"
        );
        let err = DecodeError::InvalidDimensions {
            width: 0,
            height: 720,
        };
        assert_eq!(err.to_string(), "Image has no pixels (0x720)");
    }
}
