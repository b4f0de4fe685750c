// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading and export.
//!
//! This module decodes overlay and background images into RGBA8 buffers
//! suitable for egui textures, and writes the overlay back out with the
//! current adjustments baked in.

use crate::models::overlay::{OverlayImage, RenderProxy, StaticPlacement};
use crate::util::geometry::fit_size;
use anyhow::{Context, Result};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// File extensions offered in the open dialog.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp", "gif", "tiff", "tif"];

/// Decode an image file into an overlay image named after the file.
pub fn load_image(path: &Path) -> Result<OverlayImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    decode_image(&name, &bytes)
}

/// Decode an in-memory encoded image (PNG, JPEG, ...).
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<OverlayImage> {
    let decoded = image::load_from_memory(bytes)
        .with_context(|| format!("decoding {}", name))?
        .to_rgba8();
    Ok(from_rgba(name.to_string(), decoded))
}

fn from_rgba(name: String, rgba: RgbaImage) -> OverlayImage {
    let (width, height) = rgba.dimensions();
    OverlayImage::new(name, width, height, rgba.into_raw())
}

/// Bake the render proxy's tint and opacity into the image pixels.
pub fn render_adjusted(image: &OverlayImage, proxy: &RenderProxy) -> Result<RgbaImage> {
    let mut out = RgbaImage::from_raw(image.width, image.height, image.pixels.to_vec())
        .context("pixel buffer does not match image dimensions")?;
    for pixel in out.pixels_mut() {
        for (channel, gain) in pixel.0.iter_mut().zip(proxy.tint) {
            *channel = scale_channel(*channel, gain);
        }
        pixel.0[3] = scale_channel(pixel.0[3], proxy.opacity);
    }
    Ok(out)
}

fn scale_channel(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).round().clamp(0.0, 255.0) as u8
}

/// Write the adjusted overlay as a PNG file.
pub fn export_png(image: &OverlayImage, proxy: &RenderProxy, path: &Path) -> Result<()> {
    let adjusted = render_adjusted(image, proxy)?;
    adjusted
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Draw the adjusted overlay over the background photo, arranged the way
/// the mockup view shows it. The result has the background's resolution.
pub fn compose_mockup(
    background: &OverlayImage,
    overlay: &OverlayImage,
    proxy: &RenderProxy,
    placement: &StaticPlacement,
) -> Result<RgbaImage> {
    let mut out = RgbaImage::from_raw(background.width, background.height, background.pixels.to_vec())
        .context("background buffer does not match image dimensions")?;
    let adjusted = render_adjusted(overlay, proxy)?;
    if adjusted.width() == 0 || adjusted.height() == 0 {
        return Ok(out);
    }

    let stage = Vec2::new(background.width as f32, background.height as f32);
    let size = fit_size(overlay.width, overlay.height, stage) * proxy.scale;
    if size.x <= 0.0 || size.y <= 0.0 {
        return Ok(out);
    }
    let center = stage * 0.5 + placement.offset * stage;
    // Maps destination pixels back into the overlay's frame.
    let unrotate = Vec2::from_angle(-placement.rotation);

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let local = unrotate.rotate(Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center);
        let uv = local / size + Vec2::splat(0.5);
        if !(0.0..1.0).contains(&uv.x) || !(0.0..1.0).contains(&uv.y) {
            continue;
        }
        let sx = ((uv.x * adjusted.width() as f32) as u32).min(adjusted.width() - 1);
        let sy = ((uv.y * adjusted.height() as f32) as u32).min(adjusted.height() - 1);
        blend_over(pixel, adjusted.get_pixel(sx, sy));
    }
    Ok(out)
}

fn blend_over(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let alpha = src.0[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let mixed = src.0[c] as f32 * alpha + dst.0[c] as f32 * (1.0 - alpha);
        dst.0[c] = mixed.round().clamp(0.0, 255.0) as u8;
    }
    let below = dst.0[3] as f32 / 255.0;
    dst.0[3] = ((alpha + below * (1.0 - alpha)) * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Write the mockup composite as a PNG file.
pub fn export_mockup_png(
    background: &OverlayImage,
    overlay: &OverlayImage,
    proxy: &RenderProxy,
    placement: &StaticPlacement,
    path: &Path,
) -> Result<()> {
    let composite = compose_mockup(background, overlay, proxy, placement)?;
    composite
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
