// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The placed overlay quad and the placement reticle.

use super::transform::Transform;
use glam::Vec2;
use std::sync::Arc;

/// Decoded overlay image. Pixels are RGBA8, row-major.
#[derive(Debug, Clone)]
pub struct OverlayImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}

impl OverlayImage {
    pub fn new(name: String, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            name,
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    /// Quad size: one unit wide, height following the image aspect ratio.
    pub fn quad_size(&self) -> Vec2 {
        crate::util::geometry::quad_size(self.width, self.height)
    }
}

/// Renderable properties written by the adjustment pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderProxy {
    pub opacity: f32,
    /// Per-channel multiplier; may exceed 1.0.
    pub tint: [f32; 3],
    pub scale: f32,
}

impl Default for RenderProxy {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            tint: [1.0; 3],
            scale: 1.0,
        }
    }
}

/// The single image quad in the scene.
#[derive(Debug, Clone)]
pub struct OverlayEntity {
    pub image: OverlayImage,
    pub transform: Transform,
    pub proxy: RenderProxy,
    /// False until the first placement commit.
    pub visible: bool,
}

impl OverlayEntity {
    /// A freshly loaded overlay starts hidden, waiting to be placed.
    pub fn new(image: OverlayImage) -> Self {
        Self {
            image,
            transform: Transform::IDENTITY,
            proxy: RenderProxy::default(),
            visible: false,
        }
    }

    /// World-space size of the quad, scale included.
    pub fn world_size(&self) -> Vec2 {
        self.image.quad_size() * self.transform.uniform_scale()
    }
}

/// How far the overlay may be pushed off the stage, in stage sizes.
pub const MAX_STAGE_OFFSET: f32 = 1.0;

/// Arrangement of the overlay in the photo modes.
///
/// The stage is the background photo when one is shown, otherwise the whole
/// canvas. The overlay is fitted to the stage, scaled by the render proxy,
/// then moved by `offset` and turned by `rotation`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticPlacement {
    /// Center offset as a fraction of the stage size.
    pub offset: Vec2,
    /// Clockwise on screen, in radians, within (-pi, pi].
    pub rotation: f32,
}

impl StaticPlacement {
    pub fn pan(&mut self, delta: Vec2) {
        let limit = Vec2::splat(MAX_STAGE_OFFSET);
        self.offset = (self.offset + delta).clamp(-limit, limit);
    }

    pub fn rotate(&mut self, radians: f32) {
        use std::f32::consts::{PI, TAU};
        let turned = self.rotation + radians;
        if turned.is_finite() {
            self.rotation = PI - (PI - turned).rem_euclid(TAU);
        }
    }
}

/// Latest surface hit, used as the placement crosshair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitTestReticle {
    pose: Option<Transform>,
    visible: bool,
}

impl HitTestReticle {
    /// Set pose and visibility together; `None` hides the reticle.
    pub fn update_pose(&mut self, pose: Option<Transform>) {
        self.visible = pose.is_some();
        self.pose = pose;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Pose usable for placement, only while visible.
    pub fn placement_pose(&self) -> Option<Transform> {
        if self.visible {
            self.pose
        } else {
            None
        }
    }
}
