// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from the JSON file named by `GRAFFITIXR_CONFIG`, or
//! `graffitixr.json` in the working directory. Missing keys take their
//! defaults; a missing or broken file falls back to defaults entirely.

use crate::controller::history::DEFAULT_CAPACITY;
use crate::controller::pipeline::DEFAULT_BASE_SCALE;
use crate::models::adjustments::Mode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "GRAFFITIXR_CONFIG";
pub const CONFIG_FILE: &str = "graffitixr.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history_capacity: usize,
    pub base_scale: f32,
    pub project_file_name: String,
    pub toast_seconds: f32,
    pub initial_mode: Mode,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            base_scale: DEFAULT_BASE_SCALE,
            project_file_name: "Project.gxr".to_string(),
            toast_seconds: 3.0,
            initial_mode: Mode::Ar,
            window_size: [1280.0, 720.0],
        }
    }
}

impl AppConfig {
    /// Load from the configured location, falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config")?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.history_capacity = self.history_capacity.max(1);
        if !(self.base_scale.is_finite() && self.base_scale > 0.0) {
            self.base_scale = defaults.base_scale;
        }
        if !(self.toast_seconds.is_finite() && self.toast_seconds > 0.0) {
            self.toast_seconds = defaults.toast_seconds;
        }
        if self.project_file_name.trim().is_empty() {
            self.project_file_name = defaults.project_file_name;
        }
        if self.window_size.iter().any(|v| !v.is_finite() || *v < 100.0) {
            self.window_size = defaults.window_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.base_scale, 0.5);
        assert_eq!(config.project_file_name, "Project.gxr");
        assert_eq!(config.initial_mode, Mode::Ar);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::from_json(r#"{"history_capacity": 5, "initial_mode": "TRACE"}"#).unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.initial_mode, Mode::Trace);
        assert_eq!(config.base_scale, 0.5);
    }

    #[test]
    fn test_sanitizes_bad_values() {
        let config = AppConfig::from_json(
            r#"{"history_capacity": 0, "base_scale": -1.0, "project_file_name": " ", "window_size": [10, 10]}"#,
        )
        .unwrap();
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.base_scale, 0.5);
        assert_eq!(config.project_file_name, "Project.gxr");
        assert_eq!(config.window_size, [1280.0, 720.0]);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(AppConfig::from_json("{not json").is_err());
    }
}
