//! Session WASM bindings.
//!
//! The page creates one `JsSession` per visitor and routes every widget event
//! to one of its methods. All state lives in the wrapped core `Session`; the
//! page never holds pixel data of its own beyond what it renders.
//!
//! # Example
//!
//! ```typescript
//! import init, { JsSession } from '@imagefx/wasm';
//!
//! await init();
//! // or: new JsSession({ download_encoding: 'raw_pixels' })
//! const session = new JsSession();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! session.upload(bytes, file.type);           // throws on unsupported / undecodable input
//!
//! session.apply_blur(7);
//! const dl = session.download('blur');        // undefined until the effect is applied
//! if (dl) {
//!   saveAs(new Blob([dl.bytes()], { type: dl.mime_type }), dl.file_name);
//!   dl.free();
//! }
//! ```

use imagefx_core::{Effect, Session, SessionConfig, SessionError};
use wasm_bindgen::prelude::*;

use crate::types::{effect_from_str, JsImage};

/// A prepared download.
///
/// Holds the encoded file in WASM memory until `free()` is called.
#[wasm_bindgen]
pub struct JsDownload {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsDownload {
    /// File name to save as (`gray_image.png`, `blurred_image.png`, `edge_image.png`)
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// MIME type for the Blob
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// Get the number of bytes in the file
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// File contents as Uint8Array.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// One visitor's session.
#[wasm_bindgen]
pub struct JsSession {
    inner: Session,
}

#[wasm_bindgen]
impl JsSession {
    /// Create a session.
    ///
    /// `config` may be `undefined` or a partial object with any of
    /// `canvas_width`, `canvas_height`, `resize_filter`
    /// (`nearest` | `bilinear` | `bicubic` | `lanczos3`), `apply_orientation`
    /// and `download_encoding` (`png` | `raw_pixels`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?
        };
        Ok(JsSession {
            inner: Session::with_config(config),
        })
    }

    /// Whether an image is currently loaded.
    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.source().is_some()
    }

    /// Handle a file upload.
    ///
    /// `declared` is the File's `type` (MIME) or its name. Returns the
    /// normalized 1080x720 image for the "Original Image" panel.
    pub fn upload(&mut self, bytes: &[u8], declared: Option<String>) -> Result<JsImage, JsValue> {
        self.inner
            .upload(bytes, declared.as_deref())
            .map(JsImage::from_source)
            .map_err(report)
    }

    /// Apply Grayscale to the uploaded image.
    pub fn apply_grayscale(&mut self) -> Result<JsImage, JsValue> {
        self.inner
            .apply_grayscale()
            .map(JsImage::from_result)
            .map_err(report)
    }

    /// Apply Blur with the given odd kernel size.
    pub fn apply_blur(&mut self, kernel_size: u32) -> Result<JsImage, JsValue> {
        self.inner
            .apply_blur(kernel_size)
            .map(JsImage::from_result)
            .map_err(report)
    }

    /// Apply Edge Detection with the two thresholds (any order).
    pub fn apply_edges(&mut self, low: f32, high: f32) -> Result<JsImage, JsValue> {
        self.inner
            .apply_edges(low, high)
            .map(JsImage::from_result)
            .map_err(report)
    }

    /// Whether `effect` has been applied since the last upload.
    pub fn is_shown(&self, effect: &str) -> Result<bool, JsValue> {
        let effect = effect_from_str(effect).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.inner.is_shown(effect))
    }

    /// Cached result of `effect`, or undefined if not applied.
    pub fn result(&self, effect: &str) -> Result<Option<JsImage>, JsValue> {
        let effect = effect_from_str(effect).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.inner.result(effect).map(JsImage::from_result))
    }

    /// Prepare the download for `effect`; undefined if not applied yet.
    pub fn download(&self, effect: &str) -> Result<Option<JsDownload>, JsValue> {
        let effect = effect_from_str(effect).map_err(|e| JsValue::from_str(&e))?;
        download(&self.inner, effect).map_err(report)
    }

    /// PNG bytes of the normalized source, for an `<img>` element.
    pub fn source_png(&self) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner.source_png().map_err(report)
    }

    /// PNG bytes of a cached result, for an `<img>` element.
    pub fn result_png(&self, effect: &str) -> Result<Option<Vec<u8>>, JsValue> {
        let effect = effect_from_str(effect).map_err(|e| JsValue::from_str(&e))?;
        self.inner.result_png(effect).map_err(report)
    }

    /// Drop the image and all results.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

fn download(session: &Session, effect: Effect) -> Result<Option<JsDownload>, SessionError> {
    Ok(session.download(effect)?.map(|d| JsDownload {
        file_name: d.file_name.to_string(),
        mime_type: d.mime_type.to_string(),
        bytes: d.bytes,
    }))
}

/// Log the failure to the browser console and convert it for JavaScript.
fn report(err: SessionError) -> JsValue {
    let message = JsValue::from_str(&err.to_string());
    web_sys::console::warn_1(&message);
    message
}

/// Tests that work on all targets (no JsValue involved).
#[cfg(test)]
mod tests {
    use super::*;
    use imagefx_core::encode::encode_png;
    use imagefx_core::{Channels, DownloadEncoding};

    fn png_bytes() -> Vec<u8> {
        let pixels: Vec<u8> = (0..16 * 8 * 3).map(|i| (i % 251) as u8).collect();
        encode_png(&pixels, 16, 8, Channels::Rgb).unwrap()
    }

    fn small_session(encoding: DownloadEncoding) -> Session {
        let mut config = SessionConfig::default();
        config.canvas_width = 32;
        config.canvas_height = 16;
        config.download_encoding = encoding;
        Session::with_config(config)
    }

    #[test]
    fn test_download_none_before_apply() {
        let session = small_session(DownloadEncoding::Png);
        assert!(download(&session, Effect::Grayscale).unwrap().is_none());
    }

    #[test]
    fn test_download_wraps_core_download() {
        let mut session = small_session(DownloadEncoding::Png);
        session.upload(&png_bytes(), Some("image/png")).unwrap();
        session.apply_grayscale().unwrap();

        let dl = download(&session, Effect::Grayscale).unwrap().unwrap();
        assert_eq!(dl.file_name(), "gray_image.png");
        assert_eq!(dl.mime_type(), "image/png");
        assert_eq!(&dl.bytes()[1..4], b"PNG");
    }

    #[test]
    fn test_raw_download_length() {
        let mut session = small_session(DownloadEncoding::RawPixels);
        session.upload(&png_bytes(), None).unwrap();
        session.apply_blur(3).unwrap();

        let dl = download(&session, Effect::Blur).unwrap().unwrap();
        assert_eq!(dl.byte_length(), 32 * 16 * 3);
    }
}
