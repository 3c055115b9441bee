//! Per-session state machine.
//!
//! A [`Session`] owns the uploaded [`SourceImage`] and one cache slot per
//! effect. Each user action has its own handler that touches only the slot it
//! is about:
//!
//! | action            | handler                  | on success                         |
//! |-------------------|--------------------------|------------------------------------|
//! | upload            | [`Session::upload`]      | new source, all results cleared    |
//! | apply grayscale   | [`Session::apply_grayscale`] | grayscale slot filled          |
//! | apply blur        | [`Session::apply_blur`]  | blur slot filled                   |
//! | apply edges       | [`Session::apply_edges`] | edges slot filled                  |
//! | download          | [`Session::download`]    | encoded bytes, or `None` if unset  |
//!
//! The state is `NoImage` until an upload succeeds and `ImageLoaded` after.
//! The three "shown" flags are independent and can all be set at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::decode::{self, ContainerFormat, DecodeError, FilterType, LoadOptions, SourceImage};
use crate::encode::{self, EncodeError};
use crate::filters::{self, FilterError, FilterResult};
use crate::Effect;

/// Errors surfaced to the user by session actions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected at the upload boundary before decoding.
    #[error("Unsupported upload type '{0}': only JPEG and PNG images are accepted")]
    UnsupportedUpload(String),

    /// An effect was requested before any image was loaded.
    #[error("No image has been uploaded")]
    NoImage,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// What the download action serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadEncoding {
    /// A valid PNG file of the result.
    #[default]
    Png,
    /// The bare in-memory pixel buffer, still named `*.png`.
    RawPixels,
}

/// Session configuration.
///
/// Every field has a default, so a partial object from the page is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub resize_filter: FilterType,
    pub apply_orientation: bool,
    pub download_encoding: DownloadEncoding,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            canvas_width: load.canvas_width,
            canvas_height: load.canvas_height,
            resize_filter: load.filter,
            apply_orientation: load.apply_orientation,
            download_encoding: DownloadEncoding::default(),
        }
    }
}

impl SessionConfig {
    /// Loader options derived from this configuration.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            filter: self.resize_filter,
            apply_orientation: self.apply_orientation,
        }
    }
}

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NoImage,
    ImageLoaded,
}

/// A file ready to hand to the browser (or write to disk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Explicit per-session state: the source image and one slot per effect.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    source: Option<SourceImage>,
    grayscale: Option<FilterResult>,
    blurred: Option<FilterResult>,
    edges: Option<FilterResult>,
}

impl Session {
    /// Create an empty session with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session with a custom configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        if self.source.is_some() {
            SessionState::ImageLoaded
        } else {
            SessionState::NoImage
        }
    }

    /// Whether the effect has been applied since the last upload.
    pub fn is_shown(&self, effect: Effect) -> bool {
        self.result(effect).is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// Cached result of an effect, if it has been applied.
    pub fn result(&self, effect: Effect) -> Option<&FilterResult> {
        match effect {
            Effect::Grayscale => self.grayscale.as_ref(),
            Effect::Blur => self.blurred.as_ref(),
            Effect::Edges => self.edges.as_ref(),
        }
    }

    /// Handle an upload.
    ///
    /// `declared` is the browser-reported MIME type or the file name. When
    /// present it must name JPEG or PNG, otherwise the upload is rejected
    /// before decoding and the session is left as it was. Once past that
    /// check the upload replaces the current image: all cached results are
    /// cleared, and if decoding fails the session is back to `NoImage`.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn upload(
        &mut self,
        bytes: &[u8],
        declared: Option<&str>,
    ) -> Result<&SourceImage, SessionError> {
        if let Some(declared) = declared {
            if ContainerFormat::from_declared(declared).is_none() {
                warn!(declared, "Upload rejected at boundary");
                return Err(SessionError::UnsupportedUpload(declared.to_string()));
            }
        }

        self.reset();
        match decode::load_with_options(bytes, &self.config.load_options()) {
            Ok(source) => {
                info!(
                    width = source.width(),
                    height = source.height(),
                    "Image loaded"
                );
                Ok(&*self.source.insert(source))
            }
            Err(e) => {
                warn!(error = %e, "Upload could not be decoded");
                Err(e.into())
            }
        }
    }

    /// Apply the grayscale effect to the source.
    pub fn apply_grayscale(&mut self) -> Result<&FilterResult, SessionError> {
        let result = filters::to_grayscale(self.require_source()?);
        Ok(self.store(result))
    }

    /// Apply the blur effect to the source.
    ///
    /// An invalid kernel aborts this action only; cached results are kept.
    pub fn apply_blur(&mut self, kernel_size: u32) -> Result<&FilterResult, SessionError> {
        let result = filters::blur(self.require_source()?, kernel_size).map_err(|e| {
            warn!(kernel_size, error = %e, "Blur rejected");
            e
        })?;
        Ok(self.store(result))
    }

    /// Apply edge detection to the source.
    pub fn apply_edges(&mut self, low: f32, high: f32) -> Result<&FilterResult, SessionError> {
        let result = filters::detect_edges(self.require_source()?, low, high).map_err(|e| {
            warn!(low, high, error = %e, "Edge detection rejected");
            e
        })?;
        Ok(self.store(result))
    }

    /// Apply an effect with the default control values.
    pub fn apply_default(&mut self, effect: Effect) -> Result<&FilterResult, SessionError> {
        match effect {
            Effect::Grayscale => self.apply_grayscale(),
            Effect::Blur => self.apply_blur(filters::BlurParams::default().kernel_size),
            Effect::Edges => {
                let params = filters::EdgeParams::default();
                self.apply_edges(params.low, params.high)
            }
        }
    }

    /// Prepare the download for an effect.
    ///
    /// Returns `Ok(None)` when the effect has not been applied in this session.
    pub fn download(&self, effect: Effect) -> Result<Option<Download>, SessionError> {
        let Some(result) = self.result(effect) else {
            return Ok(None);
        };

        let (mime_type, bytes) = match self.config.download_encoding {
            DownloadEncoding::Png => ("image/png", encode::encode_result(result)?),
            DownloadEncoding::RawPixels => ("application/octet-stream", result.pixels().to_vec()),
        };
        info!(%effect, len = bytes.len(), "Download prepared");

        Ok(Some(Download {
            file_name: effect.file_name(),
            mime_type,
            bytes,
        }))
    }

    /// PNG of the normalized source for the "original" preview.
    pub fn source_png(&self) -> Result<Option<Vec<u8>>, SessionError> {
        self.source
            .as_ref()
            .map(encode::encode_source)
            .transpose()
            .map_err(SessionError::from)
    }

    /// PNG of a cached result for display.
    pub fn result_png(&self, effect: Effect) -> Result<Option<Vec<u8>>, SessionError> {
        self.result(effect)
            .map(encode::encode_result)
            .transpose()
            .map_err(SessionError::from)
    }

    /// Drop the source and every cached result.
    pub fn reset(&mut self) {
        self.source = None;
        self.grayscale = None;
        self.blurred = None;
        self.edges = None;
    }

    fn require_source(&self) -> Result<&SourceImage, SessionError> {
        self.source.as_ref().ok_or(SessionError::NoImage)
    }

    fn store(&mut self, result: FilterResult) -> &FilterResult {
        let effect = result.effect();
        info!(%effect, "Effect applied");
        let slot = match effect {
            Effect::Grayscale => &mut self.grayscale,
            Effect::Blur => &mut self.blurred,
            Effect::Edges => &mut self.edges,
        };
        slot.insert(result)
    }
}
