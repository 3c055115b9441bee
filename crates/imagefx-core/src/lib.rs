//! imagefx Core - image loading, filters and session state
//!
//! This crate provides the core functionality behind the imagefx browser tool:
//! decoding an upload onto a fixed canvas, the three independent effects
//! (grayscale, Gaussian blur, edge detection), PNG encoding for display and
//! download, and the per-session state machine that ties them together.

pub mod decode;
pub mod encode;
pub mod filters;
pub mod luminance;
pub mod session;

pub use decode::{load, load_with_options, DecodeError, LoadOptions, SourceImage};
pub use filters::{
    blur, detect_edges, to_grayscale, BlurParams, ControlRange, ControlRanges, EdgeParams,
    FilterError, FilterResult,
};
pub use session::{Download, DownloadEncoding, Session, SessionConfig, SessionError, SessionState};

/// The three effects a user can apply to an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Luminance-weighted reduction to a single channel
    Grayscale,
    /// Gaussian smoothing of all three color channels
    Blur,
    /// Two-threshold gradient edge map
    Edges,
}

impl Effect {
    /// All effects in display order.
    pub const ALL: [Effect; 3] = [Effect::Grayscale, Effect::Blur, Effect::Edges];

    /// File name offered when the result of this effect is downloaded.
    pub fn file_name(self) -> &'static str {
        match self {
            Effect::Grayscale => "gray_image.png",
            Effect::Blur => "blurred_image.png",
            Effect::Edges => "edge_image.png",
        }
    }

    /// Human-readable caption for the rendered result.
    pub fn caption(self) -> &'static str {
        match self {
            Effect::Grayscale => "Gray-scaled Image",
            Effect::Blur => "Blurred Image",
            Effect::Edges => "Edge-detected Image",
        }
    }

    /// Parse an effect name as used by the web page and the CLI.
    ///
    /// Accepts the serde names plus a few common aliases, case-insensitively.
    pub fn from_name(name: &str) -> Option<Effect> {
        match name.trim().to_ascii_lowercase().as_str() {
            "grayscale" | "gray" | "grey" | "greyscale" => Some(Effect::Grayscale),
            "blur" | "blurred" => Some(Effect::Blur),
            "edges" | "edge" | "canny" => Some(Effect::Edges),
            _ => None,
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Effect::Grayscale => "grayscale",
            Effect::Blur => "blur",
            Effect::Edges => "edges",
        };
        f.write_str(name)
    }
}

/// Channel layout of a pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Channels {
    /// One 8-bit intensity channel
    Gray,
    /// Three 8-bit channels in R, G, B order
    Rgb,
}

impl Channels {
    /// Bytes per pixel.
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}
