// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps between normalized canvas coordinates (0.0 to 1.0) and
//! the simulated wall surface the desktop runtime hit-tests against, and
//! sizes image quads by aspect ratio.

use glam::{Vec2, Vec3};

/// Width of the simulated wall in meters.
pub const SURFACE_WIDTH: f32 = 2.0;

/// Distance from the viewer to the simulated wall in meters.
pub const SURFACE_DISTANCE: f32 = 2.0;

/// A vertical plane facing the viewer, spanning the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePlane {
    pub width: f32,
    pub height: f32,
    pub distance: f32,
}

impl SurfacePlane {
    /// Plane whose aspect ratio matches a canvas of the given pixel size.
    pub fn for_canvas(canvas_width: f32, canvas_height: f32) -> Self {
        let aspect = if canvas_width > 0.0 {
            canvas_height / canvas_width
        } else {
            1.0
        };
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_WIDTH * aspect,
            distance: SURFACE_DISTANCE,
        }
    }

    /// Convert normalized canvas coordinates to a point on the plane.
    pub fn point_at(&self, uv: Vec2) -> Vec3 {
        Vec3::new(
            (uv.x - 0.5) * self.width,
            (0.5 - uv.y) * self.height,
            -self.distance,
        )
    }

    /// Convert a point on the plane back to normalized canvas coordinates.
    pub fn uv_of(&self, point: Vec3) -> Vec2 {
        Vec2::new(point.x / self.width + 0.5, 0.5 - point.y / self.height)
    }

    /// Canvas pixels per meter for a canvas of the given width.
    pub fn pixels_per_meter(&self, canvas_width: f32) -> f32 {
        canvas_width / self.width
    }
}

/// Quad of unit width whose height follows the image aspect ratio.
pub fn quad_size(width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 {
        return Vec2::ONE;
    }
    Vec2::new(1.0, height as f32 / width as f32)
}

/// Largest size with the image's aspect ratio that fits in `available`.
pub fn fit_size(image_width: u32, image_height: u32, available: Vec2) -> Vec2 {
    if image_width == 0 || image_height == 0 || available.y <= 0.0 {
        return available;
    }
    let img_aspect = image_width as f32 / image_height as f32;
    let available_aspect = available.x / available.y;

    if img_aspect > available_aspect {
        // Image is wider - fit to width
        Vec2::new(available.x, available.x / img_aspect)
    } else {
        // Image is taller - fit to height
        Vec2::new(available.y * img_aspect, available.y)
    }
}
