// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main canvas: the AR view or the static photo overlay.
//!
//! In AR mode the canvas stands for the camera view of a wall. The overlay
//! is drawn where it was placed and the reticle follows the pointer. In the
//! other modes the overlay is drawn over the background photo, where it can
//! be dragged, zoomed with the wheel or a pinch, and turned with shift+wheel
//! or a two-finger twist.

use crate::controller::{CanvasGesture, GridGuide};
use crate::models::adjustments::Mode;
use crate::models::overlay::{OverlayEntity, OverlayImage, RenderProxy, StaticPlacement};
use crate::models::transform::Transform;
use crate::util::geometry::{fit_size, SurfacePlane};
use glam::{Vec2, Vec3};

/// Wheel points to zoom factor, as an exponent.
const ZOOM_PER_POINT: f32 = 0.002;
/// Wheel points to radians with shift held.
const TWIST_PER_POINT: f32 = 0.005;

/// A photo shown behind the overlay in mockup mode.
pub struct BackgroundImage {
    pub texture: egui::TextureHandle,
    /// Decoded pixels, kept for composite export.
    pub image: OverlayImage,
}

/// Everything the canvas draws this frame.
pub struct CanvasView<'a> {
    pub mode: Mode,
    pub overlay: Option<&'a OverlayEntity>,
    pub overlay_texture: Option<&'a egui::TextureHandle>,
    pub background: Option<&'a BackgroundImage>,
    pub reticle: Option<Transform>,
    pub placement: StaticPlacement,
    pub grid: GridGuide,
    pub session_active: bool,
}

/// Result of canvas interaction.
pub struct CanvasResponse {
    pub rect: egui::Rect,
    /// A select event: the canvas was clicked in AR mode.
    pub select: bool,
    /// Pan, twist or zoom input in the photo modes this frame.
    pub gesture: Option<CanvasGesture>,
}

/// Where a pointer over `rect` hits the simulated wall.
pub fn surface_hit(rect: egui::Rect, pointer: egui::Pos2) -> Option<Vec3> {
    if !rect.contains(pointer) || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let plane = SurfacePlane::for_canvas(rect.width(), rect.height());
    let uv = Vec2::new(
        (pointer.x - rect.min.x) / rect.width(),
        (pointer.y - rect.min.y) / rect.height(),
    );
    Some(plane.point_at(uv))
}

/// Display the canvas and report select events.
pub fn show(ui: &mut egui::Ui, view: &CanvasView<'_>) -> CanvasResponse {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    let painter = ui.painter_at(rect);

    let mut gesture = None;
    match view.mode {
        Mode::Ar => draw_ar(&painter, rect, view),
        Mode::Overlay | Mode::Mockup | Mode::Trace => {
            let stage = stage_rect(rect, view.mode, view.background.map(|b| &b.image));
            draw_static(&painter, rect, stage, view);
            if view.overlay.is_some() {
                gesture = read_gesture(ui, &response, stage);
            }
        }
    }

    if view.overlay.is_none() {
        draw_welcome(&painter, rect);
    }

    CanvasResponse {
        rect,
        select: view.mode.uses_reticle() && response.clicked(),
        gesture,
    }
}

/// Area the static overlay is arranged against: the fitted background
/// photo in mockup mode, otherwise the whole canvas.
fn stage_rect(rect: egui::Rect, mode: Mode, background: Option<&OverlayImage>) -> egui::Rect {
    match (mode, background) {
        (Mode::Mockup, Some(image)) => {
            let size = fit_size(image.width, image.height, to_vec2(rect.size()));
            egui::Rect::from_center_size(rect.center(), egui::vec2(size.x, size.y))
        }
        _ => rect,
    }
}

fn read_gesture(ui: &egui::Ui, response: &egui::Response, stage: egui::Rect) -> Option<CanvasGesture> {
    let drag = response.drag_delta();
    let (zoom, twist) = if response.hovered() {
        ui.input(|i| {
            let wheel = i.raw_scroll_delta.x + i.raw_scroll_delta.y;
            let touch_twist = i.multi_touch().map_or(0.0, |t| t.rotation_delta);
            if i.modifiers.shift {
                (i.zoom_delta(), touch_twist + wheel * TWIST_PER_POINT)
            } else {
                let wheel_zoom = (i.raw_scroll_delta.y * ZOOM_PER_POINT).exp();
                (i.zoom_delta() * wheel_zoom, touch_twist)
            }
        })
    } else {
        (1.0, 0.0)
    };
    gesture_from(drag, zoom, twist, stage.size())
}

/// Convert raw pointer input into a gesture, `None` when nothing moved.
fn gesture_from(drag: egui::Vec2, zoom: f32, twist: f32, stage: egui::Vec2) -> Option<CanvasGesture> {
    if stage.x <= 0.0 || stage.y <= 0.0 {
        return None;
    }
    if drag == egui::Vec2::ZERO && zoom == 1.0 && twist == 0.0 {
        return None;
    }
    Some(CanvasGesture {
        pan: Vec2::new(drag.x / stage.x, drag.y / stage.y),
        rotate: twist,
        zoom,
    })
}

fn draw_ar(painter: &egui::Painter, rect: egui::Rect, view: &CanvasView<'_>) {
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(28));
    let plane = SurfacePlane::for_canvas(rect.width(), rect.height());

    if view.grid.visible {
        draw_grid(painter, rect, view.grid);
    }

    if let (Some(overlay), Some(texture)) = (view.overlay, view.overlay_texture) {
        if overlay.visible {
            let uv = plane.uv_of(overlay.transform.position);
            let center = to_screen(rect, uv);
            let size = overlay.world_size() * plane.pixels_per_meter(rect.width());
            let (_, _, roll) = overlay.transform.orientation.to_euler(glam::EulerRot::XYZ);
            draw_quad(painter, texture, center, size, -roll, &overlay.proxy);
        }
    }

    if let Some(pose) = view.reticle {
        let center = to_screen(rect, plane.uv_of(pose.position));
        let stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);
        painter.circle_stroke(center, 14.0, stroke);
        painter.circle_stroke(center, 10.0, stroke);
    }

    if !view.session_active {
        painter.text(
            rect.center_bottom() - egui::vec2(0.0, 24.0),
            egui::Align2::CENTER_CENTER,
            "AR session not running",
            egui::FontId::proportional(14.0),
            egui::Color32::from_gray(150),
        );
    }
}

fn draw_static(painter: &egui::Painter, rect: egui::Rect, stage: egui::Rect, view: &CanvasView<'_>) {
    let fill = match view.mode {
        Mode::Trace => egui::Color32::from_gray(235),
        _ => egui::Color32::from_gray(40),
    };
    painter.rect_filled(rect, 0.0, fill);

    if view.mode == Mode::Mockup {
        if let Some(background) = view.background {
            painter.image(
                background.texture.id(),
                stage,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    if let (Some(overlay), Some(texture)) = (view.overlay, view.overlay_texture) {
        let stage_size = to_vec2(stage.size());
        let fitted = fit_size(overlay.image.width, overlay.image.height, stage_size);
        let size = fitted * overlay.transform.uniform_scale();
        let offset = view.placement.offset * stage_size;
        let center = stage.center() + egui::vec2(offset.x, offset.y);
        draw_quad(painter, texture, center, size, view.placement.rotation, &overlay.proxy);
    }
}

fn draw_quad(
    painter: &egui::Painter,
    texture: &egui::TextureHandle,
    center: egui::Pos2,
    size: Vec2,
    angle: f32,
    proxy: &RenderProxy,
) {
    let quad = egui::Rect::from_center_size(center, egui::vec2(size.x, size.y));
    let mut mesh = egui::Mesh::with_texture(texture.id());
    mesh.add_rect_with_uv(
        quad,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        tint_color(proxy),
    );
    if angle != 0.0 {
        mesh.rotate(egui::emath::Rot2::from_angle(angle), center);
    }
    painter.add(egui::Shape::mesh(mesh));
}

/// Texture tint for the preview. Gains above 1.0 saturate here; exports
/// apply them in full.
fn tint_color(proxy: &RenderProxy) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(proxy.tint[0]),
        channel(proxy.tint[1]),
        channel(proxy.tint[2]),
        channel(proxy.opacity),
    )
}

fn draw_grid(painter: &egui::Painter, rect: egui::Rect, grid: GridGuide) {
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(60));
    for i in 1..grid.cols {
        let x = rect.min.x + rect.width() * i as f32 / grid.cols as f32;
        painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
    }
    for i in 1..grid.rows {
        let y = rect.min.y + rect.height() * i as f32 / grid.rows as f32;
        painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
    }
}

fn draw_welcome(painter: &egui::Painter, rect: egui::Rect) {
    painter.text(
        rect.center() - egui::vec2(0.0, 20.0),
        egui::Align2::CENTER_CENTER,
        "GraffitiXR",
        egui::FontId::proportional(32.0),
        egui::Color32::from_gray(200),
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 16.0),
        egui::Align2::CENTER_CENTER,
        "File → Open Image... to load a design",
        egui::FontId::proportional(14.0),
        egui::Color32::from_gray(150),
    );
}

fn to_screen(rect: egui::Rect, uv: Vec2) -> egui::Pos2 {
    egui::pos2(rect.min.x + uv.x * rect.width(), rect.min.y + uv.y * rect.height())
}

fn to_vec2(v: egui::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_hit_inside_and_outside() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(400.0, 300.0));
        let hit = surface_hit(rect, rect.center()).unwrap();
        assert!(hit.x.abs() < 1e-6 && hit.y.abs() < 1e-6);
        assert!(surface_hit(rect, egui::pos2(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_hit_projects_back_to_pointer() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        let pointer = egui::pos2(200.0, 450.0);
        let hit = surface_hit(rect, pointer).unwrap();
        let plane = SurfacePlane::for_canvas(rect.width(), rect.height());
        let back = to_screen(rect, plane.uv_of(hit));
        assert!((back.x - pointer.x).abs() < 1e-3);
        assert!((back.y - pointer.y).abs() < 1e-3);
    }

    #[test]
    fn test_stage_is_fitted_background_in_mockup() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 400.0));
        let photo = OverlayImage::new("wall.jpg".into(), 100, 100, vec![0; 100 * 100 * 4]);
        let stage = stage_rect(rect, Mode::Mockup, Some(&photo));
        assert_eq!(stage.size(), egui::vec2(400.0, 400.0));
        assert_eq!(stage.center(), rect.center());

        assert_eq!(stage_rect(rect, Mode::Overlay, Some(&photo)), rect);
        assert_eq!(stage_rect(rect, Mode::Mockup, None), rect);
    }

    #[test]
    fn test_gesture_pan_is_relative_to_stage() {
        let stage = egui::vec2(400.0, 200.0);
        let gesture = gesture_from(egui::vec2(40.0, -50.0), 1.0, 0.0, stage).unwrap();
        assert_eq!(gesture.pan, Vec2::new(0.1, -0.25));
        assert_eq!(gesture.zoom, 1.0);

        assert!(gesture_from(egui::Vec2::ZERO, 1.0, 0.0, stage).is_none());
        assert!(gesture_from(egui::Vec2::ZERO, 1.1, 0.0, stage).is_some());
        assert!(gesture_from(egui::vec2(1.0, 1.0), 1.0, 0.0, egui::Vec2::ZERO).is_none());
    }

    #[test]
    fn test_tint_color_saturates() {
        let proxy = RenderProxy {
            opacity: 1.0,
            tint: [2.0, 0.5, 0.0],
            scale: 1.0,
        };
        assert_eq!(tint_color(&proxy), egui::Color32::from_rgb(255, 128, 0));
    }
}
