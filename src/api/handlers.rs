// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use crate::version;

/// Body of GET /
pub const LIVENESS_MESSAGE: &str = "eVision server is running with YOLOv8 and Tesseract OCR!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub features: Vec<String>,
    pub detector: bool,
    pub ocr: bool,
    pub issues: Vec<String>,
}

impl HealthResponse {
    pub fn from_availability(detector: bool, ocr: bool) -> Self {
        let mut issues = Vec::new();
        if !detector {
            issues.push("Object detection model not loaded".to_string());
        }
        if !ocr {
            issues.push("OCR engine not available".to_string());
        }

        Self {
            status: if issues.is_empty() { "healthy" } else { "degraded" }.to_string(),
            version: version::VERSION_NUMBER.to_string(),
            features: version::FEATURES.iter().map(|f| f.to_string()).collect(),
            detector,
            ocr,
            issues,
        }
    }
}

/// GET / - Liveness
pub async fn home_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// GET /health - Analyzer availability
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_availability(
        state.vision.has_detector(),
        state.vision.has_ocr(),
    ))
}
