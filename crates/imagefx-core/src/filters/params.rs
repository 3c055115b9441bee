//! Effect parameters and the control ranges the UI offers for them.

use serde::{Deserialize, Serialize};

use super::FilterError;

/// Slider descriptor for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl ControlRange {
    /// Check that `value` is one of the positions the slider can reach.
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max && (value - self.min) % self.step.max(1) == 0
    }

    /// Snap an arbitrary value onto the nearest reachable slider position.
    ///
    /// Ties round up.
    pub fn snap(&self, value: u32) -> u32 {
        let step = self.step.max(1);
        let clamped = value.clamp(self.min, self.max);
        let offset = clamped - self.min;
        let snapped = self.min + ((offset + step / 2) / step) * step;
        if snapped > self.max {
            snapped - step
        } else {
            snapped
        }
    }
}

/// All parameter controls exposed by the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRanges {
    /// Blur kernel size: odd values 3 through 15
    pub blur_kernel: ControlRange,
    /// Edge detection low threshold
    pub edge_low: ControlRange,
    /// Edge detection high threshold
    pub edge_high: ControlRange,
}

impl Default for ControlRanges {
    fn default() -> Self {
        Self {
            blur_kernel: ControlRange {
                min: 3,
                max: 15,
                step: 2,
                default: 5,
            },
            edge_low: ControlRange {
                min: 50,
                max: 200,
                step: 1,
                default: 100,
            },
            edge_high: ControlRange {
                min: 150,
                max: 300,
                step: 1,
                default: 200,
            },
        }
    }
}

/// Parameters for the blur effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurParams {
    /// Side length of the square Gaussian window
    pub kernel_size: u32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

impl BlurParams {
    pub fn new(kernel_size: u32) -> Self {
        Self { kernel_size }
    }

    /// Reject even or zero kernel sizes.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(FilterError::InvalidKernel {
                size: self.kernel_size,
            });
        }
        Ok(())
    }
}

/// Parameters for the edge detection effect.
///
/// The two thresholds are taken in either order; see [`EdgeParams::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeParams {
    pub low: f32,
    pub high: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 200.0,
        }
    }
}

impl EdgeParams {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Return `(weak, strong)` thresholds.
    ///
    /// When `low > high` the values are swapped, so the larger threshold is
    /// always the one a pixel must exceed to seed an edge.
    pub fn normalized(&self) -> Result<(f32, f32), FilterError> {
        let valid = |t: f32| t.is_finite() && t >= 0.0;
        if !valid(self.low) || !valid(self.high) {
            return Err(FilterError::InvalidThreshold {
                low: self.low,
                high: self.high,
            });
        }
        if self.low > self.high {
            Ok((self.high, self.low))
        } else {
            Ok((self.low, self.high))
        }
    }
}
