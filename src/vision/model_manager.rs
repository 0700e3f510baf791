// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager for loading and sharing the detector and OCR engine

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_IOU_THRESHOLD};
use crate::vision::detection::{load_labels, ObjectDetector, YoloDetector};
use crate::vision::ocr::tesseract::DEFAULT_OCR_TIMEOUT;
use crate::vision::ocr::{TesseractEngine, TextRecognizer};

/// Configuration for loading vision models
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Path to the YOLOv8 ONNX export (optional)
    pub yolo_model_path: Option<PathBuf>,
    /// Class names file overriding the COCO labels (optional)
    pub labels_path: Option<PathBuf>,
    /// Minimum detection score
    pub confidence_threshold: f32,
    /// IoU threshold for NMS
    pub iou_threshold: f32,
    /// Tesseract executable (optional)
    pub tesseract_cmd: Option<String>,
    /// Tesseract language code
    pub ocr_language: String,
    /// Per-call OCR timeout
    pub ocr_timeout: Duration,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            yolo_model_path: Some(PathBuf::from("yolov8n.onnx")),
            labels_path: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            tesseract_cmd: Some("tesseract".to_string()),
            ocr_language: "eng".to_string(),
            ocr_timeout: DEFAULT_OCR_TIMEOUT,
        }
    }
}

/// Information about a loaded vision model
#[derive(Debug, Clone)]
pub struct VisionModelInfo {
    /// Model name
    pub name: String,
    /// Model type (detection, ocr)
    pub model_type: String,
    /// Whether the model is available
    pub available: bool,
}

/// Manager for the vision analyzers (object detector and OCR engine)
///
/// Analyzers that fail to initialize are left out; the matching endpoint
/// then answers 503 instead of the whole node refusing to start.
pub struct VisionModelManager {
    detector: Option<Arc<dyn ObjectDetector>>,
    recognizer: Option<Arc<dyn TextRecognizer>>,
}

impl VisionModelManager {
    /// Create a new VisionModelManager with the given configuration
    pub async fn new(config: VisionModelConfig) -> anyhow::Result<Self> {
        let detector = match config.yolo_model_path.clone() {
            Some(path) => {
                let load_config = config.clone();
                let loaded = tokio::task::spawn_blocking(move || {
                    let mut detector = YoloDetector::new(&path)?
                        .with_confidence_threshold(load_config.confidence_threshold)
                        .with_iou_threshold(load_config.iou_threshold);
                    if let Some(ref labels_path) = load_config.labels_path {
                        detector = detector.with_labels(load_labels(labels_path)?);
                    }
                    Ok::<_, crate::vision::DetectionError>(detector)
                })
                .await?;

                match loaded {
                    Ok(detector) => {
                        tracing::info!(
                            "✅ YOLO detector ready ({} classes, confidence >= {})",
                            detector.labels().len(),
                            detector.confidence_threshold()
                        );
                        Some(Arc::new(detector) as Arc<dyn ObjectDetector>)
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Failed to load YOLO model: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        let recognizer = match config.tesseract_cmd {
            Some(ref cmd) => {
                let engine = TesseractEngine::new(cmd.clone())
                    .with_language(config.ocr_language.clone())
                    .with_timeout(config.ocr_timeout);
                match engine.check_version().await {
                    Ok(banner) => {
                        tracing::info!("✅ OCR engine ready: {}", banner);
                        Some(Arc::new(engine) as Arc<dyn TextRecognizer>)
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ OCR engine unavailable ({}): {}", cmd, e);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(Self {
            detector,
            recognizer,
        })
    }

    /// Build a manager from already constructed analyzers
    pub fn from_parts(
        detector: Option<Arc<dyn ObjectDetector>>,
        recognizer: Option<Arc<dyn TextRecognizer>>,
    ) -> Self {
        Self {
            detector,
            recognizer,
        }
    }

    /// Get the object detector if available
    pub fn get_detector(&self) -> Option<Arc<dyn ObjectDetector>> {
        self.detector.clone()
    }

    /// Get the OCR engine if available
    pub fn get_recognizer(&self) -> Option<Arc<dyn TextRecognizer>> {
        self.recognizer.clone()
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    pub fn has_ocr(&self) -> bool {
        self.recognizer.is_some()
    }

    /// List all vision models and their availability
    pub fn list_models(&self) -> Vec<VisionModelInfo> {
        vec![
            VisionModelInfo {
                name: self
                    .detector
                    .as_ref()
                    .map(|d| d.name().to_string())
                    .unwrap_or_else(|| "yolov8".to_string()),
                model_type: "detection".to_string(),
                available: self.detector.is_some(),
            },
            VisionModelInfo {
                name: self
                    .recognizer
                    .as_ref()
                    .map(|r| r.name().to_string())
                    .unwrap_or_else(|| "tesseract".to_string()),
                model_type: "ocr".to_string(),
                available: self.recognizer.is_some(),
            },
        ]
    }
}
