// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: poses, adjustments, the overlay and the saved document.

pub mod adjustments;
pub mod overlay;
pub mod project;
pub mod transform;
