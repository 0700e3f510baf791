// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detection model
//!
//! Runs an Ultralytics YOLOv8 ONNX export on CPU. The export produces a
//! single tensor of shape [1, 4 + C, N]: for each of the N candidates the
//! box centre, width and height in letterboxed model space, followed by one
//! score per class.

use std::path::Path;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use ndarray::{Array4, ArrayD, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tracing::{debug, info};

use super::labels::coco_labels;
use super::preprocessing::{preprocess_for_yolo, Letterbox};
use super::{Detection, DetectionError, ObjectDetector};
use crate::config::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_IOU_THRESHOLD};

/// Upper bound on detections kept after NMS
pub const MAX_DETECTIONS: usize = 300;

fn load_err(stage: &str, e: impl std::fmt::Display) -> DetectionError {
    DetectionError::LoadFailed(format!("{}: {}", stage, e))
}

/// YOLOv8 detector backed by an ONNX Runtime session
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Class names indexed by class id
    labels: Vec<String>,
    confidence_threshold: f32,
    iou_threshold: f32,
    model_name: String,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("labels", &self.labels.len())
            .field("confidence_threshold", &self.confidence_threshold)
            .field("iou_threshold", &self.iou_threshold)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load a YOLOv8 ONNX export
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self, DetectionError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(DetectionError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        info!("Loading YOLO model from {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| load_err("session builder", e))?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| load_err("CPU execution provider", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_err("optimization level", e))?
            .with_intra_threads(4)
            .map_err(|e| load_err("intra threads", e))?
            .commit_from_file(model_path)
            .map_err(|e| load_err(&model_path.display().to_string(), e))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        debug!("YOLO model input: {}", input_name);

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "yolov8".to_string());

        info!("✅ YOLO model {} loaded (CPU-only)", model_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels: coco_labels(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            model_name,
        })
    }

    /// Replace the class names
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Set the confidence threshold for detections
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the IoU threshold for NMS
    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Run the model on a preprocessed [1, 3, 640, 640] tensor
    fn infer(&self, input: Array4<f32>) -> Result<ArrayD<f32>, DetectionError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectionError::InferenceFailed("session lock poisoned".to_string()))?;

        let input_value = Value::from_array(input)
            .map_err(|e| DetectionError::InferenceFailed(format!("input tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| DetectionError::InferenceFailed(e.to_string()))?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| DetectionError::InferenceFailed(format!("output tensor: {}", e)))?;

        debug!("YOLO output shape: {:?}", output.shape());

        Ok(output.to_owned())
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectionError> {
        let (input, letterbox) = preprocess_for_yolo(image);
        let output = self.infer(input)?;

        let candidates = decode_predictions(
            output.view(),
            &self.labels,
            self.confidence_threshold,
            &letterbox,
        )?;
        let detections = non_max_suppression(candidates, self.iou_threshold);

        debug!("Detected {} objects", detections.len());
        Ok(detections)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Decode raw YOLOv8 output into candidate detections
///
/// Accepts both [1, 4 + C, N] (Ultralytics default) and the transposed
/// [1, N, 4 + C] layout, picking the axis that matches the label count even
/// when there are fewer candidates than features. Candidates whose best class score is below
/// `threshold` are dropped.
pub fn decode_predictions(
    output: ArrayViewD<f32>,
    labels: &[String],
    threshold: f32,
    letterbox: &Letterbox,
) -> Result<Vec<Detection>, DetectionError> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        return Err(DetectionError::InvalidOutput(shape));
    }

    // The feature axis is the one holding 4 box values plus one score per label
    let expected = labels.len() + 4;
    let channels_first = if shape[1] == expected {
        true
    } else if shape[2] == expected {
        false
    } else {
        shape[1] <= shape[2] || shape[2] <= 4
    };
    let (features, candidates) = if channels_first {
        (shape[1], shape[2])
    } else {
        (shape[2], shape[1])
    };
    if features <= 4 {
        return Err(DetectionError::InvalidOutput(shape));
    }

    let value = |feature: usize, candidate: usize| -> f32 {
        if channels_first {
            output[IxDyn(&[0, feature, candidate])]
        } else {
            output[IxDyn(&[0, candidate, feature])]
        }
    };

    let mut detections = Vec::new();
    for candidate in 0..candidates {
        let (class_id, score) = (4..features)
            .map(|feature| (feature - 4, value(feature, candidate)))
            .fold((0, f32::MIN), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            });

        if score < threshold {
            continue;
        }

        let cx = value(0, candidate);
        let cy = value(1, candidate);
        let w = value(2, candidate);
        let h = value(3, candidate);
        let bounding_box =
            letterbox.to_original(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0);

        let label = labels
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", class_id));

        detections.push(Detection {
            class_id,
            label,
            confidence: score,
            bounding_box,
        });
    }

    Ok(detections)
}

/// Class-wise greedy non-maximum suppression
///
/// Returns detections sorted by descending confidence, at most
/// `MAX_DETECTIONS` of them.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len().min(MAX_DETECTIONS));
    for detection in detections {
        if kept.len() >= MAX_DETECTIONS {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_id == detection.class_id
                && k.bounding_box.iou(&detection.bounding_box) > iou_threshold
        });
        if !suppressed {
            kept.push(detection);
        }
    }

    kept
}
