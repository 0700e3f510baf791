// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection response types

use serde::{Deserialize, Serialize};

use crate::storage::AUDIO_FILE_NAME;

/// Response from object detection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectObjectsResponse {
    /// Unique labels, most confident first
    pub objects: Vec<String>,
    /// Name of the published audio file
    pub audio: String,
}

impl DetectObjectsResponse {
    pub fn new(objects: Vec<String>) -> Self {
        Self {
            objects,
            audio: AUDIO_FILE_NAME.to_string(),
        }
    }
}
