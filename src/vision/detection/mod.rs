// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection for uploaded images
//!
//! Components:
//! - `yolo` - YOLOv8 ONNX model and output decoding
//! - `preprocessing` - Letterbox preprocessing for the model
//! - `labels` - Class names (COCO by default)

pub mod labels;
pub mod preprocessing;
pub mod yolo;

use std::collections::HashSet;

use image::DynamicImage;
use thiserror::Error;

pub use labels::{coco_labels, load_labels, COCO_CLASSES};
pub use preprocessing::{preprocess_for_yolo, Letterbox, YOLO_INPUT_SIZE};
pub use yolo::YoloDetector;

/// Label reported when nothing was detected
pub const UNKNOWN_OBJECT: &str = "unknown object";

/// Errors from the object detector
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Detection model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load detection model: {0}")]
    LoadFailed(String),

    #[error("Unexpected model output shape: {0:?}")]
    InvalidOutput(Vec<usize>),

    #[error("Detection inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid labels: {0}")]
    InvalidLabels(String),
}

/// Axis-aligned box in original image pixels (corner form)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// A single detected object
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

/// Object detector seam used by the request handlers
///
/// Implementations are CPU bound; callers run them on the blocking pool.
pub trait ObjectDetector: Send + Sync {
    /// Detect objects above the detector's confidence threshold
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectionError>;

    /// Model name for logging and health reporting
    fn name(&self) -> &str;
}

/// Unique labels ordered by their best confidence, or `[UNKNOWN_OBJECT]`
pub fn collect_labels(detections: &[Detection]) -> Vec<String> {
    let mut ranked: Vec<&Detection> = detections.iter().collect();
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for detection in ranked {
        if seen.insert(detection.label.as_str()) {
            labels.push(detection.label.clone());
        }
    }

    if labels.is_empty() {
        labels.push(UNKNOWN_OBJECT.to_string());
    }

    labels
}
