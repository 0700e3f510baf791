// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition response types

use serde::{Deserialize, Serialize};

use crate::storage::AUDIO_FILE_NAME;

/// Response from text recognition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectTextResponse {
    /// Trimmed OCR output, or "No readable text"
    pub text: String,
    /// Name of the published audio file
    pub audio: String,
}

impl DetectTextResponse {
    pub fn new(text: String) -> Self {
        Self {
            text,
            audio: AUDIO_FILE_NAME.to_string(),
        }
    }
}
