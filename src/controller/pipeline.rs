// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Maps adjustment parameters onto the overlay's render proxy.
//!
//! Every call recomputes the proxy from the full parameter set, so applying
//! the same parameters twice always yields the same result. `contrast` and
//! `saturation` are carried through state and project files but do not
//! affect the proxy.

use crate::models::adjustments::AdjustmentParameters;
use crate::models::overlay::RenderProxy;

/// Base size factor applied on top of `adjustments.scale`.
pub const DEFAULT_BASE_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentPipeline {
    base_scale: f32,
}

impl Default for AdjustmentPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_SCALE)
    }
}

impl AdjustmentPipeline {
    pub fn new(base_scale: f32) -> Self {
        Self { base_scale }
    }

    pub fn evaluate(&self, adjustments: &AdjustmentParameters) -> RenderProxy {
        // Brightness 0.5 is neutral gain.
        let gain = 2.0 * adjustments.brightness;
        RenderProxy {
            opacity: adjustments.opacity,
            tint: [adjustments.r * gain, adjustments.g * gain, adjustments.b * gain],
            scale: self.base_scale * adjustments.scale,
        }
    }

    pub fn apply(&self, adjustments: &AdjustmentParameters, proxy: &mut RenderProxy) {
        *proxy = self.evaluate(adjustments);
    }
}
