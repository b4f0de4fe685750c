// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: mode selection, session control and quick actions.
//!
//! This module provides the toolbar interface for switching editor modes,
//! starting or ending the AR session, toggling lock and light, and the
//! undo/redo/magic row.

use crate::controller::{InteractionController, Phase};
use crate::models::adjustments::Mode;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    SetMode(Mode),
    StartSession,
    EndSession,
    ToggleLock,
    ToggleLight,
    Undo,
    Redo,
    Magic,
}

/// Display the toolbar and report the clicked action.
pub fn show(ui: &mut egui::Ui, controller: &InteractionController, session_active: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Mode:");
        for mode in Mode::ALL {
            if ui.selectable_label(controller.mode() == mode, mode.label()).clicked() {
                action = ToolbarAction::SetMode(mode);
            }
        }

        ui.separator();

        if controller.mode() == Mode::Ar {
            let label = if session_active { "⏹ End AR" } else { "▶ Start AR" };
            if ui.button(label).clicked() {
                action = if session_active {
                    ToolbarAction::EndSession
                } else {
                    ToolbarAction::StartSession
                };
            }
            ui.separator();
        }

        let lock_label = if controller.is_locked() { "🔒 Locked" } else { "🔓 Lock" };
        if ui.selectable_label(controller.is_locked(), lock_label).clicked() {
            action = ToolbarAction::ToggleLock;
        }
        if ui.selectable_label(controller.torch_on(), "💡 Light").clicked() {
            action = ToolbarAction::ToggleLight;
        }

        ui.separator();

        if controller.overlay().is_some() {
            let history = controller.history_state();
            if ui.add_enabled(history.can_undo, egui::Button::new("↶ Undo")).clicked() {
                action = ToolbarAction::Undo;
            }
            if ui.add_enabled(history.can_redo, egui::Button::new("↷ Redo")).clicked() {
                action = ToolbarAction::Redo;
            }
            if ui.button("✨ Magic").on_hover_text("Reset all adjustments").clicked() {
                action = ToolbarAction::Magic;
            }
            ui.separator();
        }

        let hint = match (controller.phase(), controller.mode()) {
            (Phase::Idle, _) => "Open an image to begin",
            (Phase::Locked, _) => "Placement locked",
            (Phase::Placing, Mode::Ar) if !session_active => "Start the AR session to find surfaces",
            (Phase::Placing, Mode::Ar) => "Click a surface to place the overlay",
            (Phase::Placing, Mode::Mockup) => "Open a background photo to mock up",
            (Phase::Placing, _) => "Tune the overlay with the adjustment sliders",
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
