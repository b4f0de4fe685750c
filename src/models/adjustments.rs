// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Visual blend parameters and the editor mode.
//!
//! Adjustments are always handled as a complete set: history snapshots and
//! saved projects copy the whole struct, never individual fields.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// User-tunable blend controls for the overlay image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentParameters {
    pub opacity: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub scale: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl AdjustmentParameters {
    /// Settings at which the overlay is drawn unchanged.
    pub const NEUTRAL: Self = Self {
        opacity: 1.0,
        brightness: 0.5,
        contrast: 0.5,
        saturation: 0.5,
        scale: 1.0,
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn get(&self, kind: AdjustmentKind) -> f32 {
        match kind {
            AdjustmentKind::Opacity => self.opacity,
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
            AdjustmentKind::Scale => self.scale,
            AdjustmentKind::Red => self.r,
            AdjustmentKind::Green => self.g,
            AdjustmentKind::Blue => self.b,
        }
    }

    /// Set one field, clamping to its range. Non-finite values are ignored.
    pub fn set(&mut self, kind: AdjustmentKind, value: f32) {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite {} value", kind.label());
            return;
        }
        let range = kind.range();
        let value = value.clamp(*range.start(), *range.end());
        let slot = match kind {
            AdjustmentKind::Opacity => &mut self.opacity,
            AdjustmentKind::Brightness => &mut self.brightness,
            AdjustmentKind::Contrast => &mut self.contrast,
            AdjustmentKind::Saturation => &mut self.saturation,
            AdjustmentKind::Scale => &mut self.scale,
            AdjustmentKind::Red => &mut self.r,
            AdjustmentKind::Green => &mut self.g,
            AdjustmentKind::Blue => &mut self.b,
        };
        *slot = value;
    }

    /// Copy with every field clamped into range; non-finite fields take the
    /// neutral value.
    pub fn sanitized(&self) -> Self {
        let mut out = Self::NEUTRAL;
        for kind in AdjustmentKind::ALL {
            out.set(kind, self.get(kind));
        }
        out
    }
}

/// Identifies one adjustment slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjustmentKind {
    Opacity,
    Brightness,
    Contrast,
    Saturation,
    Scale,
    Red,
    Green,
    Blue,
}

impl AdjustmentKind {
    pub const ALL: [AdjustmentKind; 8] = [
        AdjustmentKind::Opacity,
        AdjustmentKind::Brightness,
        AdjustmentKind::Contrast,
        AdjustmentKind::Saturation,
        AdjustmentKind::Scale,
        AdjustmentKind::Red,
        AdjustmentKind::Green,
        AdjustmentKind::Blue,
    ];

    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            AdjustmentKind::Opacity
            | AdjustmentKind::Brightness
            | AdjustmentKind::Contrast
            | AdjustmentKind::Saturation => 0.0..=1.0,
            AdjustmentKind::Scale => 0.05..=10.0,
            AdjustmentKind::Red | AdjustmentKind::Green | AdjustmentKind::Blue => 0.0..=2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AdjustmentKind::Opacity => "Opacity",
            AdjustmentKind::Brightness => "Brightness",
            AdjustmentKind::Contrast => "Contrast",
            AdjustmentKind::Saturation => "Saturation",
            AdjustmentKind::Scale => "Scale",
            AdjustmentKind::Red => "Red",
            AdjustmentKind::Green => "Green",
            AdjustmentKind::Blue => "Blue",
        }
    }
}

/// Session-wide editor mode. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Ar,
    Overlay,
    Mockup,
    Trace,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Ar, Mode::Overlay, Mode::Mockup, Mode::Trace];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Ar => "AR",
            Mode::Overlay => "Overlay",
            Mode::Mockup => "Mockup",
            Mode::Trace => "Trace",
        }
    }

    /// Whether hit-testing and the reticle are active in this mode.
    pub fn uses_reticle(self) -> bool {
        matches!(self, Mode::Ar)
    }
}
