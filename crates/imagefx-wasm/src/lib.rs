//! imagefx WASM - WebAssembly bindings for the imagefx page
//!
//! This crate exposes the imagefx-core session to the browser.
//!
//! # Module Structure
//!
//! - `session` - `JsSession`: upload, apply effects, download
//! - `types` - WASM-compatible wrapper types for image data
//! - `controls` - Slider ranges and defaults for effect parameters
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSession, controls } from '@imagefx/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsSession();
//! const original = session.upload(bytes, file.type);
//! console.log(`Loaded ${original.width}x${original.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod controls;
mod session;
mod types;

pub use controls::{controls, snap_kernel_size};
pub use session::{JsDownload, JsSession};
pub use types::JsImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "imagefx wasm {} ready",
        env!("CARGO_PKG_VERSION")
    )));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
