// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GraffitiXR - place a design on a wall and see it before you paint it
//!
//! A desktop application for placing a 2-D image onto a tracked surface,
//! positioning it with a hit-test reticle, and tuning how it blends with
//! the scene.

mod app;
mod config;
mod controller;
mod error;
mod io;
mod models;
mod ui;
mod util;
mod xr;

use anyhow::Result;
use app::GraffitiApp;
use config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0])
            .with_title("GraffitiXR"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "GraffitiXR",
        options,
        Box::new(move |cc| Ok(Box::new(GraffitiApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
