// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the eVision node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-yolo-tesseract-gtts-2026-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "object-detection",
    "text-recognition",
    "speech-synthesis",
    "per-request-audio",
    "atomic-audio-publish",
];

/// Get the full version string
pub fn get_version_string() -> String {
    format!("eVision Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
