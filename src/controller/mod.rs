// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction controller.
//!
//! Owns every piece of mutable editor state: the overlay, the reticle, the
//! adjustments, history and the AR session binding. The host calls
//! [`InteractionController::on_frame`] once per rendered frame and forwards
//! user actions between frames, so all mutation happens on one thread.

pub mod history;
pub mod pipeline;
pub mod session;

use crate::config::AppConfig;
use crate::error::ProjectError;
use crate::io::serialization;
use crate::models::adjustments::{AdjustmentKind, AdjustmentParameters, Mode};
use crate::models::overlay::{HitTestReticle, OverlayEntity, OverlayImage, StaticPlacement};
use crate::models::project::ProjectDocument;
use crate::xr::{XrFrame, XrRuntime};
use glam::Vec2;
use history::{HistoryEntry, HistoryStack, UndoRedoState};
use pipeline::AdjustmentPipeline;
use session::SessionLifecycle;

pub const GRID_MIN: u8 = 1;
pub const GRID_MAX: u8 = 8;

/// Placement state, derived from the overlay and the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image loaded yet.
    Idle,
    /// Select events place the overlay at the reticle.
    Placing,
    /// Select events are ignored.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Short user-facing message, shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Alignment grid drawn over the AR view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGuide {
    pub rows: u8,
    pub cols: u8,
    pub visible: bool,
}

impl Default for GridGuide {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 2,
            visible: false,
        }
    }
}

/// One frame of pan, twist and zoom input on the photo-mode canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGesture {
    /// Movement as a fraction of the stage size.
    pub pan: Vec2,
    pub rotate: f32,
    /// Multiplicative; 1.0 leaves the scale alone.
    pub zoom: f32,
}

pub struct InteractionController {
    mode: Mode,
    locked: bool,
    torch_on: bool,
    grid: GridGuide,
    adjustments: AdjustmentParameters,
    overlay: Option<OverlayEntity>,
    reticle: HitTestReticle,
    placement: StaticPlacement,
    /// Adjustments when the current canvas gesture began
    gesture_origin: Option<AdjustmentParameters>,
    history: HistoryStack,
    pipeline: AdjustmentPipeline,
    session: SessionLifecycle,
    notices: Vec<Notice>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            mode: config.initial_mode,
            locked: false,
            torch_on: false,
            grid: GridGuide::default(),
            adjustments: AdjustmentParameters::NEUTRAL,
            overlay: None,
            reticle: HitTestReticle::default(),
            placement: StaticPlacement::default(),
            gesture_origin: None,
            history: HistoryStack::new(config.history_capacity),
            pipeline: AdjustmentPipeline::new(config.base_scale),
            session: SessionLifecycle::new(),
            notices: Vec::new(),
        }
    }

    // ---- accessors ----

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    pub fn grid(&self) -> GridGuide {
        self.grid
    }

    pub fn adjustments(&self) -> &AdjustmentParameters {
        &self.adjustments
    }

    pub fn overlay(&self) -> Option<&OverlayEntity> {
        self.overlay.as_ref()
    }

    pub fn reticle(&self) -> &HitTestReticle {
        &self.reticle
    }

    pub fn placement(&self) -> StaticPlacement {
        self.placement
    }

    pub fn history_state(&self) -> UndoRedoState {
        self.history.state()
    }

    pub fn phase(&self) -> Phase {
        match (&self.overlay, self.locked) {
            (None, _) => Phase::Idle,
            (Some(_), true) => Phase::Locked,
            (Some(_), false) => Phase::Placing,
        }
    }

    /// Messages queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            text: text.into(),
        });
    }

    // ---- frame loop and session ----

    /// Per-frame update: poll acquisition and move the reticle.
    pub fn on_frame(&mut self, frame: Option<&dyn XrFrame>, runtime: &mut dyn XrRuntime) {
        let pose = self.session.on_frame(frame, runtime);
        if self.mode.uses_reticle() {
            self.reticle.update_pose(pose);
        } else {
            self.reticle.update_pose(None);
        }
    }

    pub fn session_started(&mut self) {
        log::info!("AR session started");
    }

    pub fn session_ended(&mut self) {
        self.session.on_session_end();
        self.reticle.update_pose(None);
        self.torch_on = false;
    }

    // ---- overlay lifecycle ----

    /// Replace the overlay with a new, not yet placed, image. History
    /// belongs to the previous image and is dropped.
    pub fn on_image_loaded(&mut self, image: OverlayImage) {
        if let Some(old) = self.overlay.take() {
            log::info!("Replacing overlay {}", old.image.name);
        }
        self.history.clear();
        self.placement = StaticPlacement::default();
        self.gesture_origin = None;
        log::info!("Overlay image {} ({}x{})", image.name, image.width, image.height);
        let name = image.name.clone();
        self.overlay = Some(OverlayEntity::new(image));
        self.refresh_overlay();
        let hint = if self.mode.uses_reticle() {
            "tap a surface to place"
        } else {
            "ready"
        };
        self.notify(NoticeKind::Info, format!("Loaded {}: {}", name, hint));
    }

    /// The previous overlay, if any, stays as it was.
    pub fn on_image_failed(&mut self, message: &str) {
        log::error!("Failed to load image: {}", message);
        self.notify(NoticeKind::Error, format!("Could not load image: {}", message));
    }

    pub fn new_project(&mut self) {
        self.overlay = None;
        self.adjustments = AdjustmentParameters::NEUTRAL;
        self.locked = false;
        self.placement = StaticPlacement::default();
        self.gesture_origin = None;
        self.history.clear();
        log::info!("New project");
        self.notify(NoticeKind::Info, "New project");
    }

    // ---- placement, mode and toggles ----

    /// Commit the reticle pose to the overlay. Ignored while locked, while
    /// the reticle is hidden, or before an image is loaded.
    pub fn select(&mut self) -> bool {
        if self.locked {
            log::debug!("Select ignored: locked");
            return false;
        }
        let Some(pose) = self.reticle.placement_pose() else {
            return false;
        };
        if self.overlay.is_none() {
            return false;
        }

        let before = self.snapshot();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.transform.set_pose(pose.position, pose.orientation);
            overlay.visible = true;
        }
        self.refresh_overlay();
        self.history.push(before);
        log::info!(
            "Placed overlay at ({:.3}, {:.3}, {:.3})",
            pose.position.x,
            pose.position.y,
            pose.position.z
        );
        true
    }

    /// Placement state and history are kept across mode switches.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        if !mode.uses_reticle() {
            self.reticle.update_pose(None);
        }
        log::info!("Mode: {}", mode.label());
    }

    pub fn set_locked(&mut self, locked: bool) {
        if self.locked != locked {
            self.locked = locked;
            log::info!("Placement {}", if locked { "locked" } else { "unlocked" });
        }
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.set_locked(!self.locked);
        self.locked
    }

    pub fn toggle_torch(&mut self, runtime: &mut dyn XrRuntime) {
        let wanted = !self.torch_on;
        match runtime.set_torch(wanted) {
            Ok(()) => self.torch_on = wanted,
            Err(e) => {
                log::warn!("Torch toggle failed: {}", e);
                self.notify(NoticeKind::Error, format!("Light unavailable: {}", e));
            }
        }
    }

    pub fn set_grid_size(&mut self, rows: u8, cols: u8) {
        self.grid.rows = rows.clamp(GRID_MIN, GRID_MAX);
        self.grid.cols = cols.clamp(GRID_MIN, GRID_MAX);
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.grid.visible = visible;
    }

    /// Feed this frame's photo-mode gesture, `None` when there was none.
    /// Pan and twist move the overlay unless locked. Zoom previews the
    /// scale adjustment, and a run of gesture frames is recorded as one
    /// action once it ends.
    pub fn on_canvas_gesture(&mut self, gesture: Option<CanvasGesture>) {
        let Some(gesture) = gesture else {
            if let Some(before) = self.gesture_origin.take() {
                self.commit_adjustments(before);
            }
            return;
        };
        if self.mode.uses_reticle() || self.overlay.is_none() {
            return;
        }
        let origin = self.adjustments;
        self.gesture_origin.get_or_insert(origin);

        if !self.locked {
            self.placement.pan(gesture.pan);
            self.placement.rotate(gesture.rotate);
        }
        if gesture.zoom.is_finite() && gesture.zoom > 0.0 && gesture.zoom != 1.0 {
            let scale = self.adjustments.scale * gesture.zoom;
            self.preview_adjustment(AdjustmentKind::Scale, scale);
        }
    }

    // ---- adjustments ----

    /// Change one adjustment as a single undoable action.
    pub fn set_adjustment(&mut self, kind: AdjustmentKind, value: f32) {
        let before = self.snapshot();
        let mut next = self.adjustments;
        next.set(kind, value);
        if next == self.adjustments {
            return;
        }
        self.adjustments = next;
        self.refresh_overlay();
        self.history.push(before);
    }

    /// Change one adjustment without recording history. Pair with
    /// [`InteractionController::commit_adjustments`] once the edit ends.
    pub fn preview_adjustment(&mut self, kind: AdjustmentKind, value: f32) {
        self.adjustments.set(kind, value);
        self.refresh_overlay();
    }

    /// Record the edit that started from `before` as one history entry.
    pub fn commit_adjustments(&mut self, before: AdjustmentParameters) {
        if before == self.adjustments {
            return;
        }
        let mut entry = self.snapshot();
        entry.adjustments = before;
        self.history.push(entry);
    }

    /// Back to neutral adjustments, as one undoable action.
    pub fn reset_adjustments(&mut self) {
        if self.adjustments == AdjustmentParameters::NEUTRAL {
            return;
        }
        let before = self.snapshot();
        self.adjustments = AdjustmentParameters::NEUTRAL;
        self.refresh_overlay();
        self.history.push(before);
        self.notify(NoticeKind::Info, "Adjustments reset");
    }

    // ---- history ----

    pub fn undo(&mut self) -> UndoRedoState {
        let current = self.snapshot();
        if let Some(previous) = self.history.undo(current) {
            self.restore(previous);
            log::info!("Undo");
        }
        self.history.state()
    }

    pub fn redo(&mut self) -> UndoRedoState {
        let current = self.snapshot();
        if let Some(next) = self.history.redo(current) {
            self.restore(next);
            log::info!("Redo");
        }
        self.history.state()
    }

    fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            adjustments: self.adjustments,
            transform: self
                .overlay
                .as_ref()
                .filter(|o| o.visible)
                .map(|o| o.transform),
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.adjustments = entry.adjustments;
        if let Some(overlay) = self.overlay.as_mut() {
            match entry.transform {
                Some(t) => {
                    overlay.transform.set_pose(t.position, t.orientation);
                    overlay.visible = true;
                }
                None => overlay.visible = false,
            }
        }
        self.refresh_overlay();
    }

    /// Recompute the render proxy and the derived uniform scale.
    fn refresh_overlay(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            self.pipeline.apply(&self.adjustments, &mut overlay.proxy);
            overlay.transform.set_uniform_scale(overlay.proxy.scale);
        }
    }

    // ---- project files ----

    pub fn save_document(&self) -> ProjectDocument {
        ProjectDocument::new(self.adjustments, self.overlay.as_ref().map(|o| &o.transform))
    }

    /// Overwrite adjustments and pose from a saved document. Does not touch
    /// history and leaves the overlay's visibility as it is.
    pub fn load_document(&mut self, document: &ProjectDocument) {
        self.adjustments = document.adjustments.sanitized();
        if let (Some(t), Some(overlay)) = (document.transform.as_ref(), self.overlay.as_mut()) {
            overlay.transform.set_pose(t.position(), t.orientation());
        }
        self.refresh_overlay();
    }

    /// Parse and apply a project file's text. On failure nothing changes
    /// and an error notice is queued.
    pub fn load_project_text(&mut self, text: &str) -> Result<(), ProjectError> {
        match serialization::parse_document(text, &self.adjustments) {
            Ok(document) => {
                self.load_document(&document);
                log::info!("Project loaded (version {})", document.version);
                self.notify(NoticeKind::Info, "Project loaded");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load project: {}", e);
                self.notify(NoticeKind::Error, "Failed to load project");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::session::tests::{RecordingRuntime, ScriptedFrame};
    use super::*;
    use glam::Vec3;

    fn image() -> OverlayImage {
        OverlayImage::new("design.png".into(), 4, 2, vec![255; 32])
    }

    /// Controller with an acquired hit-test source.
    fn ready() -> (InteractionController, RecordingRuntime) {
        let mut controller = InteractionController::default();
        let mut runtime = RecordingRuntime::default();
        let idle = ScriptedFrame { hit: None };
        controller.session_started();
        controller.on_frame(Some(&idle), &mut runtime);
        runtime.grant_space();
        controller.on_frame(Some(&idle), &mut runtime);
        runtime.grant_source();
        controller.on_frame(Some(&idle), &mut runtime);
        (controller, runtime)
    }

    fn aim(controller: &mut InteractionController, runtime: &mut RecordingRuntime, at: Option<Vec3>) {
        let frame = ScriptedFrame { hit: at };
        controller.on_frame(Some(&frame), runtime);
    }

    fn place(controller: &mut InteractionController, runtime: &mut RecordingRuntime, at: Vec3) {
        aim(controller, runtime, Some(at));
        assert!(controller.select());
    }

    fn placed_position(controller: &InteractionController) -> Option<Vec3> {
        controller
            .overlay()
            .filter(|o| o.visible)
            .map(|o| o.transform.position)
    }

    #[test]
    fn test_image_load_creates_hidden_overlay() {
        let mut controller = InteractionController::default();
        assert_eq!(controller.phase(), Phase::Idle);
        controller.on_image_loaded(image());
        let overlay = controller.overlay().unwrap();
        assert!(!overlay.visible);
        assert_eq!(overlay.transform.scale, Vec3::splat(0.5));
        assert_eq!(controller.phase(), Phase::Placing);
        assert_eq!(controller.take_notices().len(), 1);
    }

    #[test]
    fn test_select_places_at_reticle() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        let p = Vec3::new(0.3, -0.2, -2.0);
        place(&mut controller, &mut runtime, p);
        assert_eq!(placed_position(&controller), Some(p));
        assert!(controller.history_state().can_undo);

        // Further selects keep re-placing.
        let q = Vec3::new(-0.5, 0.1, -2.0);
        place(&mut controller, &mut runtime, q);
        assert_eq!(placed_position(&controller), Some(q));
    }

    #[test]
    fn test_select_gating() {
        let (mut controller, mut runtime) = ready();

        // No overlay.
        aim(&mut controller, &mut runtime, Some(Vec3::ZERO));
        assert!(!controller.select());
        assert!(!controller.history_state().can_undo);

        // Reticle hidden.
        controller.on_image_loaded(image());
        aim(&mut controller, &mut runtime, None);
        assert!(!controller.select());
        assert!(!controller.overlay().unwrap().visible);

        // Locked.
        let p = Vec3::new(0.1, 0.1, -2.0);
        place(&mut controller, &mut runtime, p);
        let state = controller.history_state();
        controller.toggle_lock();
        assert_eq!(controller.phase(), Phase::Locked);
        aim(&mut controller, &mut runtime, Some(Vec3::new(0.9, 0.9, -2.0)));
        assert!(!controller.select());
        assert_eq!(placed_position(&controller), Some(p));
        assert_eq!(controller.history_state(), state);

        controller.toggle_lock();
        assert!(controller.select());
    }

    #[test]
    fn test_undo_redo_scenario() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        controller.preview_adjustment(AdjustmentKind::Opacity, 0.8);
        assert!(!controller.history_state().can_undo);

        let p1 = Vec3::new(0.2, 0.3, -2.0);
        place(&mut controller, &mut runtime, p1);
        controller.set_adjustment(AdjustmentKind::Opacity, 0.3);
        let final_adjustments = *controller.adjustments();
        let final_transform = controller.overlay().unwrap().transform;

        let state = controller.undo();
        assert_eq!(controller.adjustments().opacity, 0.8);
        assert_eq!(placed_position(&controller), Some(p1));
        assert!(state.can_undo && state.can_redo);
        assert_eq!(controller.history.redo_len(), 1);

        let state = controller.undo();
        assert!(!controller.overlay().unwrap().visible);
        assert!(!state.can_undo);

        controller.redo();
        let state = controller.redo();
        assert!(!state.can_redo);
        assert_eq!(*controller.adjustments(), final_adjustments);
        assert_eq!(controller.overlay().unwrap().transform, final_transform);
        assert!(controller.overlay().unwrap().visible);
    }

    #[test]
    fn test_undo_all_then_redo_all_restores_final_state() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        for i in 0..6 {
            let x = i as f32 * 0.1;
            place(&mut controller, &mut runtime, Vec3::new(x, 0.0, -2.0));
            controller.set_adjustment(AdjustmentKind::Red, 0.2 * i as f32);
        }
        controller.set_adjustment(AdjustmentKind::Brightness, 0.9);
        let final_adjustments = *controller.adjustments();
        let final_transform = controller.overlay().unwrap().transform;

        let mut undos = 0;
        while controller.history_state().can_undo {
            controller.undo();
            undos += 1;
        }
        assert_eq!(undos, 13);
        for _ in 0..undos {
            controller.redo();
        }
        assert_eq!(*controller.adjustments(), final_adjustments);
        assert_eq!(controller.overlay().unwrap().transform, final_transform);
    }

    #[test]
    fn test_new_action_invalidates_redo() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        place(&mut controller, &mut runtime, Vec3::ZERO);
        controller.set_adjustment(AdjustmentKind::Opacity, 0.5);
        controller.undo();
        assert!(controller.history_state().can_redo);

        controller.set_adjustment(AdjustmentKind::Green, 1.5);
        assert!(!controller.redo().can_redo);
        assert_eq!(controller.adjustments().g, 1.5);
        assert_eq!(controller.adjustments().opacity, 1.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut controller = InteractionController::default();
        for i in 1..=30 {
            controller.set_adjustment(AdjustmentKind::Opacity, i as f32 / 100.0);
        }
        assert_eq!(controller.history.undo_len(), 20);
        while controller.history_state().can_undo {
            controller.undo();
        }
        // Oldest kept entry is the state before the 11th change.
        assert_eq!(controller.adjustments().opacity, 0.10);
    }

    #[test]
    fn test_history_entry_unaffected_by_later_edits() {
        let mut controller = InteractionController::default();
        controller.set_adjustment(AdjustmentKind::Saturation, 0.9);
        controller.preview_adjustment(AdjustmentKind::Saturation, 0.1);
        controller.undo();
        assert_eq!(controller.adjustments().saturation, 0.5);
    }

    #[test]
    fn test_preview_then_commit_records_one_entry() {
        let mut controller = InteractionController::default();
        let before = *controller.adjustments();
        for v in [0.6, 0.7, 0.8] {
            controller.preview_adjustment(AdjustmentKind::Brightness, v);
        }
        controller.commit_adjustments(before);
        assert_eq!(controller.history.undo_len(), 1);
        controller.undo();
        assert_eq!(controller.adjustments().brightness, 0.5);

        // Committing with no change records nothing.
        controller.commit_adjustments(*controller.adjustments());
        assert_eq!(controller.history.undo_len(), 0);
    }

    #[test]
    fn test_unchanged_adjustment_not_recorded() {
        let mut controller = InteractionController::default();
        controller.set_adjustment(AdjustmentKind::Opacity, 1.0);
        assert!(!controller.history_state().can_undo);
    }

    #[test]
    fn test_adjustment_updates_proxy_and_scale() {
        let mut controller = InteractionController::default();
        controller.on_image_loaded(image());
        controller.set_adjustment(AdjustmentKind::Scale, 2.0);
        controller.set_adjustment(AdjustmentKind::Brightness, 1.0);
        let overlay = controller.overlay().unwrap();
        assert_eq!(overlay.proxy.scale, 1.0);
        assert_eq!(overlay.transform.scale, Vec3::ONE);
        assert_eq!(overlay.proxy.tint, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_reset_adjustments_is_undoable() {
        let mut controller = InteractionController::default();
        controller.set_adjustment(AdjustmentKind::Blue, 0.4);
        controller.reset_adjustments();
        assert_eq!(*controller.adjustments(), AdjustmentParameters::NEUTRAL);
        controller.undo();
        assert_eq!(controller.adjustments().b, 0.4);
    }

    #[test]
    fn test_mode_switch_keeps_placement_and_history() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        let p = Vec3::new(0.4, 0.0, -2.0);
        place(&mut controller, &mut runtime, p);

        controller.set_mode(Mode::Mockup);
        assert!(!controller.reticle().is_visible());
        aim(&mut controller, &mut runtime, Some(Vec3::ZERO));
        assert!(!controller.reticle().is_visible());
        assert!(!controller.select());
        assert_eq!(placed_position(&controller), Some(p));
        assert!(controller.history_state().can_undo);

        controller.set_mode(Mode::Ar);
        aim(&mut controller, &mut runtime, Some(Vec3::ZERO));
        assert!(controller.reticle().is_visible());
    }

    #[test]
    fn test_session_end_hides_reticle() {
        let (mut controller, mut runtime) = ready();
        aim(&mut controller, &mut runtime, Some(Vec3::ZERO));
        assert!(controller.reticle().is_visible());
        controller.session_ended();
        assert!(!controller.reticle().is_visible());
        controller.on_frame(None, &mut runtime);
        assert!(!controller.reticle().is_visible());
    }

    #[test]
    fn test_image_failure_keeps_previous_overlay() {
        let mut controller = InteractionController::default();
        controller.on_image_loaded(image());
        controller.take_notices();
        controller.on_image_failed("unsupported format");
        assert_eq!(controller.overlay().unwrap().image.name, "design.png");
        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
    }

    #[test]
    fn test_new_project_resets() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        place(&mut controller, &mut runtime, Vec3::ZERO);
        controller.set_adjustment(AdjustmentKind::Opacity, 0.2);
        controller.set_mode(Mode::Mockup);
        controller.on_canvas_gesture(gesture(Vec2::new(0.2, 0.2), 0.3, 1.0));
        controller.set_locked(true);
        controller.new_project();
        assert_eq!(controller.placement(), StaticPlacement::default());
        assert!(controller.overlay().is_none());
        assert_eq!(*controller.adjustments(), AdjustmentParameters::NEUTRAL);
        assert_eq!(controller.history_state(), UndoRedoState::default());
        assert!(!controller.is_locked());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_torch_toggle() {
        let mut controller = InteractionController::default();
        let mut runtime = RecordingRuntime::default();
        controller.toggle_torch(&mut runtime);
        assert!(controller.torch_on());
        assert_eq!(runtime.torch, Some(true));

        runtime.torch_fails = true;
        controller.toggle_torch(&mut runtime);
        assert!(controller.torch_on());
        assert_eq!(controller.take_notices().last().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_grid_size_is_clamped() {
        let mut controller = InteractionController::default();
        controller.set_grid_size(0, 12);
        assert_eq!(controller.grid().rows, GRID_MIN);
        assert_eq!(controller.grid().cols, GRID_MAX);
        controller.set_grid_visible(true);
        assert!(controller.grid().visible);
    }

    fn gesture(pan: Vec2, rotate: f32, zoom: f32) -> Option<CanvasGesture> {
        Some(CanvasGesture { pan, rotate, zoom })
    }

    #[test]
    fn test_canvas_gesture_moves_overlay_in_photo_modes() {
        let mut controller = InteractionController::default();
        controller.on_image_loaded(image());
        controller.set_mode(Mode::Mockup);
        controller.on_canvas_gesture(gesture(Vec2::new(0.1, -0.2), 0.5, 1.0));
        controller.on_canvas_gesture(gesture(Vec2::new(0.1, 0.0), 0.25, 1.0));
        controller.on_canvas_gesture(None);

        let placement = controller.placement();
        assert!((placement.offset - Vec2::new(0.2, -0.2)).length() < 1e-6);
        assert!((placement.rotation - 0.75).abs() < 1e-6);
        // Moving alone is not an adjustment change.
        assert!(!controller.history_state().can_undo);
    }

    #[test]
    fn test_canvas_zoom_is_one_undo_step() {
        let mut controller = InteractionController::default();
        controller.on_image_loaded(image());
        controller.set_mode(Mode::Overlay);
        for _ in 0..3 {
            controller.on_canvas_gesture(gesture(Vec2::ZERO, 0.0, 2.0));
        }
        controller.on_canvas_gesture(None);
        assert_eq!(controller.adjustments().scale, 8.0);
        assert_eq!(controller.overlay().unwrap().transform.scale, Vec3::splat(4.0));
        assert_eq!(controller.history.undo_len(), 1);

        controller.undo();
        assert_eq!(controller.adjustments().scale, 1.0);
    }

    #[test]
    fn test_canvas_gesture_ignored_in_ar_and_without_overlay() {
        let mut controller = InteractionController::default();
        controller.set_mode(Mode::Mockup);
        controller.on_canvas_gesture(gesture(Vec2::new(0.3, 0.3), 0.0, 2.0));
        assert_eq!(controller.placement(), StaticPlacement::default());

        controller.on_image_loaded(image());
        controller.set_mode(Mode::Ar);
        controller.on_canvas_gesture(gesture(Vec2::new(0.3, 0.3), 0.0, 2.0));
        controller.on_canvas_gesture(None);
        assert_eq!(controller.placement(), StaticPlacement::default());
        assert_eq!(controller.adjustments().scale, 1.0);
    }

    #[test]
    fn test_lock_freezes_static_placement_but_not_zoom() {
        let mut controller = InteractionController::default();
        controller.on_image_loaded(image());
        controller.set_mode(Mode::Mockup);
        controller.set_locked(true);
        controller.on_canvas_gesture(gesture(Vec2::new(0.3, 0.0), 1.0, 1.5));
        controller.on_canvas_gesture(None);
        assert_eq!(controller.placement(), StaticPlacement::default());
        assert_eq!(controller.adjustments().scale, 1.5);
        assert!(controller.undo().can_redo);
    }

    #[test]
    fn test_lock_only_blocks_placement() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        let p = Vec3::new(0.2, 0.0, -2.0);
        place(&mut controller, &mut runtime, p);
        controller.set_adjustment(AdjustmentKind::Opacity, 0.5);
        controller.set_locked(true);

        controller.set_adjustment(AdjustmentKind::Red, 0.3);
        assert_eq!(controller.adjustments().r, 0.3);
        controller.undo();
        assert_eq!(controller.adjustments().r, 1.0);
        controller.redo();
        assert_eq!(controller.adjustments().r, 0.3);
        controller.reset_adjustments();
        assert_eq!(*controller.adjustments(), AdjustmentParameters::NEUTRAL);

        controller.undo();
        controller.undo();
        controller.undo();
        assert_eq!(controller.adjustments().opacity, 1.0);
        assert_eq!(placed_position(&controller), Some(p));
        assert!(controller.is_locked());
    }

    #[test]
    fn test_image_replacement_drops_history() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        place(&mut controller, &mut runtime, Vec3::new(0.5, 0.5, -2.0));
        controller.set_adjustment(AdjustmentKind::Opacity, 0.4);

        controller.on_image_loaded(OverlayImage::new("second.png".into(), 2, 2, vec![0; 16]));
        assert_eq!(controller.history_state(), UndoRedoState::default());
        controller.undo();
        assert!(!controller.overlay().unwrap().visible);
        // Adjustments carry over to the new image.
        assert_eq!(controller.adjustments().opacity, 0.4);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        place(&mut controller, &mut runtime, Vec3::new(0.25, -0.75, -2.0));
        if let Some(overlay) = controller.overlay.as_mut() {
            let q = glam::Quat::from_euler(glam::EulerRot::XYZ, 0.3, -0.7, 0.45);
            overlay.transform.set_pose(overlay.transform.position, q);
        }
        controller.set_adjustment(AdjustmentKind::Opacity, 0.35);
        controller.set_adjustment(AdjustmentKind::Contrast, 0.9);
        controller.set_adjustment(AdjustmentKind::Scale, 1.75);
        let saved = controller.save_document();
        let text = serialization::to_json(&saved).unwrap();
        let adjustments = *controller.adjustments();
        let transform = controller.overlay().unwrap().transform;

        controller.reset_adjustments();
        place(&mut controller, &mut runtime, Vec3::new(-0.9, 0.9, -2.0));
        if let Some(overlay) = controller.overlay.as_mut() {
            overlay.transform.set_pose(Vec3::ONE, glam::Quat::from_rotation_z(1.1));
        }
        let history_before = controller.history.undo_len();

        controller.load_project_text(&text).unwrap();
        assert_eq!(*controller.adjustments(), adjustments);
        let loaded = controller.overlay().unwrap().transform;
        assert_eq!(loaded.position, transform.position);
        assert_eq!(loaded.orientation, transform.orientation);
        assert_eq!(loaded.scale, Vec3::splat(0.5 * 1.75));
        // Loading is not an undoable action.
        assert_eq!(controller.history.undo_len(), history_before);
    }

    #[test]
    fn test_save_load_keeps_orientation_exactly() {
        let (mut controller, mut runtime) = ready();
        controller.on_image_loaded(image());
        place(&mut controller, &mut runtime, Vec3::new(0.1, 0.2, -2.0));

        let mut mismatches = 0;
        for i in 0..2000 {
            let a = i as f32 * 0.0031;
            let q = glam::Quat::from_euler(glam::EulerRot::XYZ, a, 1.3 - a, a * 2.1);
            let p = Vec3::new(a, -a, -2.0);
            if let Some(overlay) = controller.overlay.as_mut() {
                overlay.transform.set_pose(p, q);
            }
            let text = serialization::to_json(&controller.save_document()).unwrap();
            if let Some(overlay) = controller.overlay.as_mut() {
                overlay.transform.set_pose(Vec3::ZERO, glam::Quat::IDENTITY);
            }
            controller.load_project_text(&text).unwrap();
            let loaded = controller.overlay().unwrap().transform;
            if loaded.orientation.to_array() != q.to_array() || loaded.position != p {
                mismatches += 1;
            }
        }
        assert_eq!(mismatches, 0);
    }

    #[test]
    fn test_load_failure_leaves_state_untouched() {
        let mut controller = InteractionController::default();
        controller.set_adjustment(AdjustmentKind::Opacity, 0.4);
        let before = *controller.adjustments();
        assert!(controller.load_project_text("{ \"version\": 1, \"adjust").is_err());
        assert_eq!(*controller.adjustments(), before);
        let notices = controller.take_notices();
        assert_eq!(notices.last().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_load_without_overlay_applies_adjustments_only() {
        let mut controller = InteractionController::default();
        let text = r#"{"version":1,"adjustments":{"opacity":0.5,"brightness":0.5,"contrast":0.5,
            "saturation":0.5,"scale":2.0,"r":1.0,"g":1.0,"b":1.0},
            "transform":{"position":[1,2,3],"quaternion":[0,0,0,1]}}"#;
        controller.load_project_text(text).unwrap();
        assert_eq!(controller.adjustments().scale, 2.0);
        assert!(controller.overlay().is_none());
    }
}
