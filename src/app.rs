// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It owns textures, file dialogs and background
//! loaders, drives the controller's frame loop and forwards every user
//! action to it.

use crate::config::AppConfig;
use crate::controller::InteractionController;
use crate::io::{media, serialization};
use crate::models::adjustments::{AdjustmentParameters, Mode};
use crate::models::overlay::OverlayImage;
use crate::ui::canvas::{self, BackgroundImage, CanvasView};
use crate::ui::properties::{self, PropertiesAction};
use crate::ui::toast::Notifier;
use crate::ui::toolbar::{self, ToolbarAction};
use crate::xr::simulated::SimulatedRuntime;
use crate::xr::XrFrame;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Result of a background loading operation.
enum Loaded {
    Overlay(Result<OverlayImage, String>),
    Background(Result<OverlayImage, String>),
    Project(Result<String, String>),
}

/// Background jobs. All of them report on one channel that lives as long
/// as the app, so starting a load never drops another one's result.
struct Loaders {
    sender: Sender<Loaded>,
    receiver: Receiver<Loaded>,
    pending: usize,
    /// Message of the most recent job still running
    message: Option<String>,
}

impl Loaders {
    fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            pending: 0,
            message: None,
        }
    }

    fn spawn<F>(&mut self, message: &str, ctx: &egui::Context, job: F)
    where
        F: FnOnce() -> Loaded + Send + 'static,
    {
        self.pending += 1;
        self.message = Some(message.to_string());
        let sender = self.sender.clone();
        let ctx = ctx.clone();

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let _ = sender.send(job());
            ctx.request_repaint();
        });
    }

    /// Results that finished since the last call, in completion order.
    fn poll(&mut self) -> Vec<Loaded> {
        let done: Vec<Loaded> = self.receiver.try_iter().collect();
        self.pending = self.pending.saturating_sub(done.len());
        if self.pending == 0 {
            self.message = None;
        }
        done
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Main application state.
pub struct GraffitiApp {
    config: AppConfig,

    /// All editor state and behavior
    controller: InteractionController,

    /// Desktop stand-in for the AR device
    runtime: SimulatedRuntime,

    /// Texture of the current overlay image
    overlay_texture: Option<egui::TextureHandle>,

    /// Photo behind the overlay in mockup mode
    background: Option<BackgroundImage>,

    /// Background file loading
    loaders: Loaders,

    /// Canvas area from the previous frame, for hit-testing the pointer
    canvas_rect: Option<egui::Rect>,

    /// Adjustments when the current slider drag started
    drag_origin: Option<AdjustmentParameters>,

    toasts: Notifier,
}

impl GraffitiApp {
    /// Create a new GraffitiXR application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            controller: InteractionController::new(&config),
            runtime: SimulatedRuntime::new().with_waker(cc.egui_ctx.clone()),
            overlay_texture: None,
            background: None,
            loaders: Loaders::new(),
            canvas_rect: None,
            drag_origin: None,
            toasts: Notifier::new(config.toast_seconds),
            config,
        }
    }

    /// Load an overlay image file (asynchronously).
    fn load_overlay_file(&mut self, path: PathBuf, ctx: &egui::Context) {
        self.loaders.spawn("Loading image...", ctx, move || {
            Loaded::Overlay(media::load_image(&path).map_err(|e| format!("{:#}", e)))
        });
    }

    /// Load a background photo for mockup mode (asynchronously).
    fn load_background_file(&mut self, path: PathBuf, ctx: &egui::Context) {
        self.loaders.spawn("Loading background...", ctx, move || {
            Loaded::Background(media::load_image(&path).map_err(|e| format!("{:#}", e)))
        });
    }

    /// Read a project file (asynchronously); it is applied once read.
    fn load_project_file(&mut self, path: PathBuf, ctx: &egui::Context) {
        self.loaders.spawn("Loading project...", ctx, move || {
            Loaded::Project(serialization::read_project_text(&path).map_err(|e| e.to_string()))
        });
    }

    fn poll_loaders(&mut self, ctx: &egui::Context) {
        for result in self.loaders.poll() {
            self.apply_loaded(ctx, result);
        }
    }

    fn apply_loaded(&mut self, ctx: &egui::Context, result: Loaded) {
        match result {
            Loaded::Overlay(Ok(image)) => {
                self.overlay_texture = Some(upload(ctx, "overlay_image", &image));
                self.controller.on_image_loaded(image);
            }
            Loaded::Overlay(Err(e)) => self.controller.on_image_failed(&e),
            Loaded::Background(Ok(image)) => {
                log::info!("Loaded background {} ({}x{})", image.name, image.width, image.height);
                self.background = Some(BackgroundImage {
                    texture: upload(ctx, "background_image", &image),
                    image,
                });
            }
            Loaded::Background(Err(e)) => {
                log::error!("Failed to load background: {}", e);
                self.toasts.error("Could not load background photo");
            }
            Loaded::Project(Ok(text)) => {
                // Errors are reported through the controller's notices.
                let _ = self.controller.load_project_text(&text);
            }
            Loaded::Project(Err(e)) => {
                log::error!("Failed to read project: {}", e);
                self.toasts.error("Failed to load project");
            }
        }
    }

    fn save_project(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("GraffitiXR Project", &["gxr", "json"])
            .set_file_name(&self.config.project_file_name)
            .save_file()
        else {
            return;
        };
        let document = self.controller.save_document();
        match serialization::write_project(&document, &path) {
            Ok(()) => {
                log::info!("Saved project to {}", path.display());
                self.toasts.info("Project Saved");
            }
            Err(e) => {
                log::error!("Failed to save project: {}", e);
                self.toasts.error("Failed to save project");
            }
        }
    }

    /// Export the adjusted overlay, composited over the background photo in
    /// mockup mode.
    fn export_image(&mut self) {
        let Some(overlay) = self.controller.overlay() else {
            self.toasts.error("Nothing to export");
            return;
        };
        let background = self
            .background
            .as_ref()
            .filter(|_| self.controller.mode() == Mode::Mockup);
        let file_name = if background.is_some() {
            "GraffitiXR_Mockup.png"
        } else {
            "GraffitiXR_Export.png"
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };
        let result = match background {
            Some(background) => media::export_mockup_png(
                &background.image,
                &overlay.image,
                &overlay.proxy,
                &self.controller.placement(),
                &path,
            ),
            None => media::export_png(&overlay.image, &overlay.proxy, &path),
        };
        match result {
            Ok(()) => {
                log::info!("Exported overlay to {}", path.display());
                self.toasts.info("Image exported");
            }
            Err(e) => {
                log::error!("Failed to export image: {:#}", e);
                self.toasts.error("Failed to export image");
            }
        }
    }

    fn new_project(&mut self) {
        self.controller.new_project();
        self.overlay_texture = None;
        self.drag_origin = None;
    }

    fn start_session(&mut self) {
        self.runtime.start_session();
        self.controller.session_started();
    }

    fn end_session(&mut self) {
        self.runtime.end_session();
        self.controller.session_ended();
    }

    /// Run the controller's per-frame update against the simulated device.
    fn run_frame(&mut self, ctx: &egui::Context) {
        let pointer = ctx.input(|i| i.pointer.hover_pos());
        let hit = match (self.canvas_rect, pointer) {
            (Some(rect), Some(pos)) => canvas::surface_hit(rect, pos),
            _ => None,
        };
        let frame = self.runtime.frame(hit);
        self.controller
            .on_frame(frame.as_ref().map(|f| f as &dyn XrFrame), &mut self.runtime);

        // XR-style animation loop while the session runs.
        if self.runtime.is_session_active() {
            ctx.request_repaint();
        }
    }

    fn handle_toolbar(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::SetMode(mode) => self.controller.set_mode(mode),
            ToolbarAction::StartSession => self.start_session(),
            ToolbarAction::EndSession => self.end_session(),
            ToolbarAction::ToggleLock => {
                self.controller.toggle_lock();
            }
            ToolbarAction::ToggleLight => self.controller.toggle_torch(&mut self.runtime),
            ToolbarAction::Undo => {
                self.controller.undo();
            }
            ToolbarAction::Redo => {
                self.controller.redo();
            }
            ToolbarAction::Magic => self.controller.reset_adjustments(),
            ToolbarAction::None => {}
        }
    }

    fn handle_properties(&mut self, actions: Vec<PropertiesAction>) {
        for action in actions {
            match action {
                PropertiesAction::Set(kind, value) => self.controller.set_adjustment(kind, value),
                PropertiesAction::Preview(kind, value) => self.controller.preview_adjustment(kind, value),
                PropertiesAction::Commit(before) => self.controller.commit_adjustments(before),
                PropertiesAction::SetGridSize { rows, cols } => self.controller.set_grid_size(rows, cols),
                PropertiesAction::SetGridVisible(visible) => self.controller.set_grid_visible(visible),
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Only process if no text field is focused
        if ctx.wants_keyboard_input() {
            return;
        }

        // Handle undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.controller.undo();
        }

        // Handle redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.controller.redo();
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project").clicked() {
                        self.new_project();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Open Image...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", media::IMAGE_EXTENSIONS)
                            .pick_file()
                        {
                            self.load_overlay_file(path, ctx);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Background Photo...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", media::IMAGE_EXTENSIONS)
                            .pick_file()
                        {
                            self.load_background_file(path, ctx);
                            self.controller.set_mode(Mode::Mockup);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Load Project...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("GraffitiXR Project", &["gxr", "json"])
                            .pick_file()
                        {
                            self.load_project_file(path, ctx);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Save Project...").clicked() {
                        self.save_project();
                        ui.close_menu();
                    }
                    if ui.button("Export Image...").clicked() {
                        self.export_image();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let history = self.controller.history_state();
                    if ui
                        .add_enabled(history.can_undo, egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.controller.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(history.can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.controller.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Reset Adjustments").clicked() {
                        self.controller.reset_adjustments();
                        ui.close_menu();
                    }
                });
            });
        });
    }
}

/// Upload decoded pixels as an egui texture.
fn upload(ctx: &egui::Context, name: &str, image: &OverlayImage) -> egui::TextureHandle {
    let size = [image.width as usize, image.height as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}

impl eframe::App for GraffitiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed loading
        self.poll_loaders(ctx);

        // Hit-test before anything reads the reticle this frame.
        self.run_frame(ctx);

        self.menu_bar(ctx);

        // Toolbar
        let session_active = self.runtime.is_session_active();
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.controller, session_active))
            .inner;
        self.handle_toolbar(toolbar_action);

        // Properties panel (right side)
        let adjustments = *self.controller.adjustments();
        let mode = self.controller.mode();
        let grid = self.controller.grid();
        let drag_origin = &mut self.drag_origin;
        let property_actions = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| properties::show(ui, &adjustments, mode, grid, drag_origin))
            .inner;
        self.handle_properties(property_actions);

        self.handle_shortcuts(ctx);

        // Main canvas (center)
        let canvas_response = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(message) = self.loaders.message() {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    return None;
                }
                let view = CanvasView {
                    mode: self.controller.mode(),
                    overlay: self.controller.overlay(),
                    overlay_texture: self.overlay_texture.as_ref(),
                    background: self.background.as_ref(),
                    reticle: self.controller.reticle().placement_pose(),
                    placement: self.controller.placement(),
                    grid: self.controller.grid(),
                    session_active,
                };
                Some(canvas::show(ui, &view))
            })
            .inner;

        let gesture = canvas_response.as_ref().and_then(|r| r.gesture);
        self.controller.on_canvas_gesture(gesture);
        if let Some(response) = canvas_response {
            self.canvas_rect = Some(response.rect);
            if response.select {
                self.controller.select();
            }
        }

        // Request repaint if still loading (to update spinner)
        if self.loaders.message().is_some() {
            ctx.request_repaint();
        }

        for notice in self.controller.take_notices() {
            self.toasts.push(notice);
        }
        self.toasts.show(ctx);
    }
}
