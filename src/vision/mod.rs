// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based image analysis
//!
//! This module provides:
//! - Object detection via YOLOv8 (ONNX Runtime)
//! - OCR (Optical Character Recognition) via the Tesseract CLI
//!
//! Both analyzers are created once at startup by `VisionModelManager` and
//! shared by every request.

pub mod detection;
pub mod image_utils;
pub mod model_manager;
pub mod ocr;

pub use detection::{
    collect_labels, Detection, DetectionError, ObjectDetector, YoloDetector, UNKNOWN_OBJECT,
};
pub use image_utils::{decode_image_bytes, encode_png, ImageError, ImageInfo};
pub use model_manager::{VisionModelConfig, VisionModelInfo, VisionModelManager};
pub use ocr::{normalize_text, OcrError, TesseractEngine, TextRecognizer, NO_READABLE_TEXT};
