// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ties the hit-test subscription to the lifetime of an AR session.
//!
//! On the first frame of a session a viewer space is requested, then a
//! hit-test source against it. Acquisition is attempted once per session;
//! a rejection leaves the reticle hidden until the next session. Ending the
//! session bumps the generation counter, so replies still in flight for the
//! old session are discarded when they arrive.

use crate::models::transform::Transform;
use crate::xr::{
    Acquired, Completion, HitTestSource, ReferenceSpaceKind, Reply, XrFrame, XrRuntime,
};
use std::sync::mpsc::{channel, Receiver, Sender};

pub struct SessionLifecycle {
    generation: u64,
    source_requested: bool,
    hit_test_source: Option<HitTestSource>,
    sender: Sender<Completion>,
    replies: Receiver<Completion>,
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLifecycle {
    pub fn new() -> Self {
        let (sender, replies) = channel();
        Self {
            generation: 0,
            source_requested: false,
            hit_test_source: None,
            sender,
            replies,
        }
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn hit_test_source(&self) -> Option<HitTestSource> {
        self.hit_test_source
    }

    #[cfg(test)]
    pub fn source_requested(&self) -> bool {
        self.source_requested
    }

    /// Run once per rendered frame. `frame` is `Some` while a session is
    /// active. Returns the surface pose for the reticle, if any.
    pub fn on_frame(
        &mut self,
        frame: Option<&dyn XrFrame>,
        runtime: &mut dyn XrRuntime,
    ) -> Option<Transform> {
        self.drain_replies(runtime);

        let frame = frame?;

        if !self.source_requested {
            self.source_requested = true;
            log::debug!("Requesting viewer space (generation {})", self.generation);
            runtime.request_reference_space(
                ReferenceSpaceKind::Viewer,
                Reply::new(self.generation, self.sender.clone(), Acquired::ViewerSpace),
            );
        }

        let source = self.hit_test_source?;
        let results = frame.hit_test_results(&source);
        let first = results.first()?;
        frame.pose(first, &frame.reference_space())
    }

    /// Session-end handler: forget the source so the next session
    /// acquires its own.
    pub fn on_session_end(&mut self) {
        self.generation += 1;
        self.source_requested = false;
        self.hit_test_source = None;
        log::info!("AR session ended; hit-test source released");
    }

    fn drain_replies(&mut self, runtime: &mut dyn XrRuntime) {
        while let Ok(completion) = self.replies.try_recv() {
            if completion.generation != self.generation {
                log::debug!(
                    "Discarding stale XR reply from generation {} (current {})",
                    completion.generation,
                    self.generation
                );
                continue;
            }
            match completion.outcome {
                Ok(Acquired::ViewerSpace(space)) => {
                    runtime.request_hit_test_source(
                        space,
                        Reply::new(self.generation, self.sender.clone(), Acquired::HitTestSource),
                    );
                }
                Ok(Acquired::HitTestSource(source)) => {
                    log::info!("Hit-test source acquired");
                    self.hit_test_source = Some(source);
                }
                Err(e) => {
                    // No retry until the next session.
                    log::warn!("Hit-test acquisition failed: {}", e);
                }
            }
        }
    }
}
