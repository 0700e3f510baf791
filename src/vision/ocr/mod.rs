// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction from images
//!
//! OCR is delegated to the Tesseract command line tool. The binary location
//! is configuration; nothing about its install path is assumed.

pub mod tesseract;

use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

pub use tesseract::TesseractEngine;

/// Text reported when OCR finds nothing
pub const NO_READABLE_TEXT: &str = "No readable text";

/// Errors from the OCR engine
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR binary not found: {0}")]
    BinaryNotFound(String),

    #[error("OCR process failed: {0}")]
    Failed(String),

    #[error("OCR timed out after {0}s")]
    Timeout(u64),

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to prepare image for OCR: {0}")]
    InvalidImage(String),
}

/// OCR seam used by the request handlers
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Extract raw text from an image
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Engine name for logging and health reporting
    fn name(&self) -> &str;
}

/// Trim OCR output, substituting `NO_READABLE_TEXT` when nothing remains
pub fn normalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NO_READABLE_TEXT.to_string()
    } else {
        trimmed.to_string()
    }
}
