// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AR runtime boundary.
//!
//! The controller talks to the device only through these traits. Requests
//! that the runtime resolves later are answered through a [`Reply`], which
//! carries the session generation the request was made in so that answers
//! arriving after the session ended can be told apart and dropped.

pub mod simulated;

use crate::error::XrError;
use crate::models::transform::Transform;
use std::sync::mpsc::Sender;

/// Which coordinate frame a reference space is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSpaceKind {
    /// Moves with the viewer; hit-test rays are cast from it.
    Viewer,
    /// Fixed in the world; poses handed to the scene are expressed in it.
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSpace {
    pub id: u64,
    pub kind: ReferenceSpaceKind,
}

/// Handle of a hit-test subscription. Only valid in the session it was
/// created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestSource {
    pub id: u64,
}

/// One surface intersection reported for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestResult {
    pub id: u64,
}

/// Per-frame view of an active AR session.
pub trait XrFrame {
    /// The session's world-anchored space.
    fn reference_space(&self) -> ReferenceSpace;

    /// Intersections for `source` this frame, nearest first.
    fn hit_test_results(&self, source: &HitTestSource) -> Vec<HitTestResult>;

    /// Pose of `result` expressed in `space`.
    fn pose(&self, result: &HitTestResult, space: &ReferenceSpace) -> Option<Transform>;
}

/// Device-level requests.
pub trait XrRuntime {
    fn request_reference_space(&mut self, kind: ReferenceSpaceKind, reply: Reply<ReferenceSpace>);

    fn request_hit_test_source(&mut self, space: ReferenceSpace, reply: Reply<HitTestSource>);

    fn set_torch(&mut self, on: bool) -> Result<(), XrError>;
}

/// Something the session lifecycle asked the runtime for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    ViewerSpace(ReferenceSpace),
    HitTestSource(HitTestSource),
}

/// A resolved request, tagged with the generation it was issued in.
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub outcome: Result<Acquired, XrError>,
}

/// One-shot answer channel for an asynchronous runtime request.
pub struct Reply<T> {
    generation: u64,
    sender: Sender<Completion>,
    wrap: fn(T) -> Acquired,
}

impl<T> Reply<T> {
    pub fn new(generation: u64, sender: Sender<Completion>, wrap: fn(T) -> Acquired) -> Self {
        Self {
            generation,
            sender,
            wrap,
        }
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolve the request. Safe to call from any thread.
    pub fn send(self, outcome: Result<T, XrError>) {
        let completion = Completion {
            generation: self.generation,
            outcome: outcome.map(self.wrap),
        };
        // The receiver only goes away when the controller is dropped.
        if self.sender.send(completion).is_err() {
            log::debug!("Dropping XR reply: controller no longer listening");
        }
    }
}
