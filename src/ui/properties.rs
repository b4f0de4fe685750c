// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Adjustment properties panel.
//!
//! This module provides the side panel with the blend sliders and, in AR
//! mode, the alignment grid controls. Slider drags are reported as
//! previews and committed as one action when the drag ends.

use crate::controller::{GridGuide, GRID_MAX, GRID_MIN};
use crate::models::adjustments::{AdjustmentKind, AdjustmentParameters, Mode};

/// Result of properties panel interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertiesAction {
    /// A discrete change (click or keyboard) to record right away.
    Set(AdjustmentKind, f32),
    /// Live value while a slider is being dragged.
    Preview(AdjustmentKind, f32),
    /// Drag finished; `before` is the state the drag started from.
    Commit(AdjustmentParameters),
    SetGridSize { rows: u8, cols: u8 },
    SetGridVisible(bool),
}

const COLOR_SLIDERS: [AdjustmentKind; 3] = [AdjustmentKind::Red, AdjustmentKind::Green, AdjustmentKind::Blue];

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    adjustments: &AdjustmentParameters,
    mode: Mode,
    grid: GridGuide,
    drag_origin: &mut Option<AdjustmentParameters>,
) -> Vec<PropertiesAction> {
    let mut actions = Vec::new();

    ui.heading("Adjustments");
    ui.separator();

    for kind in [
        AdjustmentKind::Opacity,
        AdjustmentKind::Brightness,
        AdjustmentKind::Contrast,
        AdjustmentKind::Saturation,
        AdjustmentKind::Scale,
    ] {
        slider(ui, adjustments, kind, drag_origin, &mut actions);
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Color balance").strong());
    for kind in COLOR_SLIDERS {
        slider(ui, adjustments, kind, drag_origin, &mut actions);
    }

    if mode == Mode::Ar {
        ui.add_space(12.0);
        ui.heading("Grid");
        ui.separator();

        let mut visible = grid.visible;
        if ui.checkbox(&mut visible, "Show grid guide").changed() {
            actions.push(PropertiesAction::SetGridVisible(visible));
        }

        let mut rows = grid.rows;
        let mut cols = grid.cols;
        let rows_changed = ui
            .add(egui::Slider::new(&mut rows, GRID_MIN..=GRID_MAX).text("Rows"))
            .changed();
        let cols_changed = ui
            .add(egui::Slider::new(&mut cols, GRID_MIN..=GRID_MAX).text("Columns"))
            .changed();
        if rows_changed || cols_changed {
            actions.push(PropertiesAction::SetGridSize { rows, cols });
        }
    }

    actions
}

fn slider(
    ui: &mut egui::Ui,
    adjustments: &AdjustmentParameters,
    kind: AdjustmentKind,
    drag_origin: &mut Option<AdjustmentParameters>,
    actions: &mut Vec<PropertiesAction>,
) {
    let mut value = adjustments.get(kind);
    let response = ui.add(egui::Slider::new(&mut value, kind.range()).text(kind.label()));
    let input = SliderInput {
        pressed: response.is_pointer_button_down_on(),
        changed: response.changed(),
        released: response.drag_stopped() || response.clicked(),
    };
    slider_actions(input, adjustments, kind, value, drag_origin, actions);
}

/// Pointer state of one slider for one frame.
#[derive(Debug, Clone, Copy, Default)]
struct SliderInput {
    pressed: bool,
    changed: bool,
    released: bool,
}

/// A gesture runs from pointer press to release, so the value a press
/// jumps to and the drag after it become one action.
fn slider_actions(
    input: SliderInput,
    adjustments: &AdjustmentParameters,
    kind: AdjustmentKind,
    value: f32,
    drag_origin: &mut Option<AdjustmentParameters>,
    actions: &mut Vec<PropertiesAction>,
) {
    if input.pressed && drag_origin.is_none() {
        *drag_origin = Some(*adjustments);
    }

    if input.changed {
        if drag_origin.is_some() {
            actions.push(PropertiesAction::Preview(kind, value));
        } else {
            actions.push(PropertiesAction::Set(kind, value));
        }
    }

    if input.released {
        if let Some(before) = drag_origin.take() {
            actions.push(PropertiesAction::Commit(before));
        }
    }
}
