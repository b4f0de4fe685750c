// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error kinds for the XR runtime boundary and project files.

use thiserror::Error;

/// Failures reported by the AR runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XrError {
    #[error("reference space request rejected: {0}")]
    ReferenceSpaceRejected(String),
    #[error("hit-test source request rejected: {0}")]
    HitTestSourceRejected(String),
    #[error("torch is not available on this device")]
    TorchUnavailable,
}

/// Failures reading or writing a project document.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to access project file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid project file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid project file: expected a JSON object")]
    NotAnObject,
}
