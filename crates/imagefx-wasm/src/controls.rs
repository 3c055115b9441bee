//! Parameter control descriptors for the page's sliders.

use imagefx_core::ControlRanges;
use wasm_bindgen::prelude::*;

/// Slider ranges and defaults for every effect parameter.
///
/// Returns a plain object:
///
/// ```typescript
/// {
///   blur_kernel: { min: 3,   max: 15,  step: 2, default: 5 },
///   edge_low:    { min: 50,  max: 200, step: 1, default: 100 },
///   edge_high:   { min: 150, max: 300, step: 1, default: 200 },
/// }
/// ```
#[wasm_bindgen]
pub fn controls() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&ControlRanges::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Snap a raw blur slider value onto the nearest odd kernel size in range.
#[wasm_bindgen]
pub fn snap_kernel_size(value: u32) -> u32 {
    ControlRanges::default().blur_kernel.snap(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_kernel_size() {
        assert_eq!(snap_kernel_size(2), 3);
        assert_eq!(snap_kernel_size(8), 9);
        assert_eq!(snap_kernel_size(100), 15);
    }
}
