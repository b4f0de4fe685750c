// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project data serialization and deserialization.
//!
//! Projects are JSON documents (conventionally `Project.gxr`). Version 1
//! documents must carry a complete adjustment set; documents of any other
//! version are applied field by field on top of the current adjustments.

use crate::error::ProjectError;
use crate::models::adjustments::AdjustmentParameters;
use crate::models::project::{LooseDocument, ProjectDocument, PROJECT_VERSION};
use std::path::Path;

/// Serialize a project document to JSON text.
pub fn to_json(document: &ProjectDocument) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse project text. `current` fills in fields missing from documents of
/// unknown versions.
pub fn parse_document(
    text: &str,
    current: &AdjustmentParameters,
) -> Result<ProjectDocument, ProjectError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ProjectError::NotAnObject);
    }

    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| u32::try_from(v).ok());

    if version == Some(PROJECT_VERSION) {
        return Ok(serde_json::from_value(value)?);
    }

    log::warn!(
        "Project version {:?} is not {}; loading known fields only",
        version,
        PROJECT_VERSION
    );
    let loose: LooseDocument = serde_json::from_value(value)?;
    Ok(ProjectDocument {
        version: version.unwrap_or(0),
        adjustments: loose
            .adjustments
            .map(|a| a.merged_onto(current))
            .unwrap_or(*current),
        transform: loose.transform,
    })
}

/// Export project data to a JSON file.
pub fn write_project(document: &ProjectDocument, path: &Path) -> Result<(), ProjectError> {
    let json = to_json(document)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a project file's text without interpreting it.
pub fn read_project_text(path: &Path) -> Result<String, ProjectError> {
    Ok(std::fs::read_to_string(path)?)
}
