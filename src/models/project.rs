// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted project document.
//!
//! The document stores the adjustments and the overlay pose. The image itself
//! and the overlay scale are not part of it; scale is governed by
//! `adjustments.scale` alone.

use super::adjustments::AdjustmentParameters;
use super::transform::Transform;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub const PROJECT_VERSION: u32 = 1;

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub version: u32,
    pub adjustments: AdjustmentParameters,
    pub transform: Option<PersistedTransform>,
}

/// Overlay pose as stored on disk: `[x, y, z]` and `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedTransform {
    pub position: [f32; 3],
    #[serde(alias = "orientation")]
    pub quaternion: [f32; 4],
}

impl From<&Transform> for PersistedTransform {
    fn from(t: &Transform) -> Self {
        Self {
            position: t.position.to_array(),
            quaternion: t.orientation.to_array(),
        }
    }
}

impl PersistedTransform {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_array(self.quaternion)
    }
}

impl ProjectDocument {
    /// Create a current-version document.
    pub fn new(adjustments: AdjustmentParameters, transform: Option<&Transform>) -> Self {
        Self {
            version: PROJECT_VERSION,
            adjustments,
            transform: transform.map(PersistedTransform::from),
        }
    }
}

/// Adjustments where every field may be missing, for documents of unknown
/// versions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LooseAdjustments {
    pub opacity: Option<f32>,
    pub brightness: Option<f32>,
    pub contrast: Option<f32>,
    pub saturation: Option<f32>,
    pub scale: Option<f32>,
    pub r: Option<f32>,
    pub g: Option<f32>,
    pub b: Option<f32>,
}

impl LooseAdjustments {
    /// Overlay the present fields onto `base`.
    pub fn merged_onto(&self, base: &AdjustmentParameters) -> AdjustmentParameters {
        AdjustmentParameters {
            opacity: self.opacity.unwrap_or(base.opacity),
            brightness: self.brightness.unwrap_or(base.brightness),
            contrast: self.contrast.unwrap_or(base.contrast),
            saturation: self.saturation.unwrap_or(base.saturation),
            scale: self.scale.unwrap_or(base.scale),
            r: self.r.unwrap_or(base.r),
            g: self.g.unwrap_or(base.g),
            b: self.b.unwrap_or(base.b),
        }
    }
}

/// Document of a version this build does not know, read field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LooseDocument {
    #[serde(default)]
    pub adjustments: Option<LooseAdjustments>,
    #[serde(default)]
    pub transform: Option<PersistedTransform>,
}
