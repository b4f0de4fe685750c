// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notifications along the bottom of the window.

use crate::controller::{Notice, NoticeKind};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

pub struct Notifier {
    toasts: Toasts,
    seconds: f32,
}

impl Notifier {
    pub fn new(seconds: f32) -> Self {
        Self {
            toasts: Toasts::new()
                .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -40.0])
                .direction(egui::Direction::BottomUp),
            seconds,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.toasts.add(toast_for(&notice, self.seconds));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        });
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);
    }
}

fn toast_for(notice: &Notice, seconds: f32) -> Toast {
    let kind = match notice.kind {
        NoticeKind::Info => ToastKind::Info,
        NoticeKind::Error => ToastKind::Error,
    };
    Toast {
        text: notice.text.clone().into(),
        kind,
        options: ToastOptions::default().duration_in_seconds(seconds as f64),
        style: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_kind_maps_to_toast_kind() {
        let error = toast_for(
            &Notice {
                kind: NoticeKind::Error,
                text: "Failed to load project".into(),
            },
            3.0,
        );
        assert!(matches!(error.kind, ToastKind::Error));
        assert_eq!(error.text.text(), "Failed to load project");

        let info = toast_for(
            &Notice {
                kind: NoticeKind::Info,
                text: "Project Saved".into(),
            },
            3.0,
        );
        assert!(matches!(info.kind, ToastKind::Info));
    }
}
