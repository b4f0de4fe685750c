// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Spatial pose of the overlay and the reticle.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, orientation and scale in the session's reference space.
///
/// The orientation is kept normalized and the scale is always uniform, since
/// it is derived from the single `scale` adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Build a unit-scale pose, normalizing the orientation.
    pub fn from_pose(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: normalize_or_identity(orientation),
            scale: Vec3::ONE,
        }
    }

    /// Replace position and orientation, keeping the current scale.
    pub fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = normalize_or_identity(orientation);
    }

    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.scale = Vec3::splat(factor);
    }

    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }
}

/// Unit quaternions pass through untouched so a saved pose reloads bit for bit.
fn normalize_or_identity(q: Quat) -> Quat {
    if q.is_normalized() {
        return q;
    }
    let len = q.length();
    if len.is_finite() && len > f32::EPSILON {
        q / len
    } else {
        Quat::IDENTITY
    }
}
