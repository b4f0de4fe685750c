// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Desktop stand-in for an AR device.
//!
//! The canvas plays the part of a detected wall: while a session runs, the
//! pointer position over the canvas is the single hit-test result. Requests
//! resolve on a background thread after a short delay, like a device would.

use super::{HitTestResult, HitTestSource, ReferenceSpace, ReferenceSpaceKind, Reply, XrFrame, XrRuntime};
use crate::error::XrError;
use crate::models::transform::Transform;
use glam::{Quat, Vec3};
use std::time::Duration;

const REQUEST_LATENCY: Duration = Duration::from_millis(60);

struct SimSession {
    local_space: ReferenceSpace,
    sources: Vec<u64>,
}

pub struct SimulatedRuntime {
    next_id: u64,
    session: Option<SimSession>,
    torch_on: bool,
    latency: Duration,
    waker: Option<egui::Context>,
}

impl Default for SimulatedRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRuntime {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            session: None,
            torch_on: false,
            latency: REQUEST_LATENCY,
            waker: None,
        }
    }

    /// Repaint `ctx` whenever a request resolves so the reply is polled.
    pub fn with_waker(mut self, ctx: egui::Context) -> Self {
        self.waker = Some(ctx);
        self
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    #[cfg(test)]
    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    pub fn start_session(&mut self) {
        if self.session.is_some() {
            return;
        }
        let local_space = ReferenceSpace {
            id: self.allocate_id(),
            kind: ReferenceSpaceKind::Local,
        };
        self.session = Some(SimSession {
            local_space,
            sources: Vec::new(),
        });
        log::info!("Simulated AR session started");
    }

    pub fn end_session(&mut self) {
        if self.session.take().is_some() {
            self.torch_on = false;
            log::info!("Simulated AR session ended");
        }
    }

    /// Frame for the active session, hitting the wall at `surface_hit`.
    pub fn frame(&self, surface_hit: Option<Vec3>) -> Option<SimulatedFrame> {
        self.session.as_ref().map(|session| SimulatedFrame {
            space: session.local_space,
            sources: session.sources.clone(),
            hit: surface_hit,
        })
    }

    fn resolve_later<T: Send + 'static>(&self, reply: Reply<T>, outcome: Result<T, XrError>) {
        let latency = self.latency;
        let waker = self.waker.clone();
        std::thread::spawn(move || {
            std::thread::sleep(latency);
            reply.send(outcome);
            if let Some(ctx) = waker {
                ctx.request_repaint();
            }
        });
    }
}

impl XrRuntime for SimulatedRuntime {
    fn request_reference_space(&mut self, kind: ReferenceSpaceKind, reply: Reply<ReferenceSpace>) {
        let outcome = if self.session.is_some() {
            Ok(ReferenceSpace {
                id: self.allocate_id(),
                kind,
            })
        } else {
            Err(XrError::ReferenceSpaceRejected("no active session".into()))
        };
        self.resolve_later(reply, outcome);
    }

    fn request_hit_test_source(&mut self, space: ReferenceSpace, reply: Reply<HitTestSource>) {
        let id = self.allocate_id();
        let outcome = match self.session.as_mut() {
            Some(session) if space.kind == ReferenceSpaceKind::Viewer => {
                session.sources.push(id);
                Ok(HitTestSource { id })
            }
            Some(_) => Err(XrError::HitTestSourceRejected(
                "hit-test rays must originate in the viewer space".into(),
            )),
            None => Err(XrError::HitTestSourceRejected("no active session".into())),
        };
        self.resolve_later(reply, outcome);
    }

    fn set_torch(&mut self, on: bool) -> Result<(), XrError> {
        if self.session.is_none() {
            return Err(XrError::TorchUnavailable);
        }
        if self.torch_on != on {
            self.torch_on = on;
            log::info!("Simulated torch {}", if on { "on" } else { "off" });
        }
        Ok(())
    }
}

/// Snapshot of the simulated session for one frame.
pub struct SimulatedFrame {
    space: ReferenceSpace,
    sources: Vec<u64>,
    hit: Option<Vec3>,
}

impl XrFrame for SimulatedFrame {
    fn reference_space(&self) -> ReferenceSpace {
        self.space
    }

    fn hit_test_results(&self, source: &HitTestSource) -> Vec<HitTestResult> {
        match self.hit {
            Some(_) if self.sources.contains(&source.id) => vec![HitTestResult { id: 0 }],
            _ => Vec::new(),
        }
    }

    fn pose(&self, _result: &HitTestResult, space: &ReferenceSpace) -> Option<Transform> {
        if *space != self.space {
            return None;
        }
        // The wall faces the viewer, so the quad keeps the identity orientation.
        self.hit.map(|p| Transform::from_pose(p, Quat::IDENTITY))
    }
}
