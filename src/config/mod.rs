// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Every option can be given as a command line flag or through the
//! environment (a `.env` file is honoured by `main`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::speech::TtsConfig;
use crate::vision::VisionModelConfig;

/// Default confidence threshold for object detection
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.1;

/// Default IoU threshold for class-wise non-maximum suppression
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.7;

/// Maximum upload size (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// eVision node configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "evision-node")]
#[command(about = "Speaks out objects and text found in uploaded images", long_about = None)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5019)]
    pub port: u16,

    /// Directory holding the published output.mp3
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// YOLOv8 ONNX model file
    #[arg(long, env = "YOLO_MODEL_PATH", default_value = "yolov8n.onnx")]
    pub model_path: PathBuf,

    /// Optional class names file, one label per line (defaults to COCO)
    #[arg(long, env = "YOLO_LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Minimum detection score
    #[arg(long, env = "DETECTION_CONFIDENCE", default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub confidence_threshold: f32,

    /// IoU threshold for non-maximum suppression
    #[arg(long, env = "DETECTION_IOU", default_value_t = DEFAULT_IOU_THRESHOLD)]
    pub iou_threshold: f32,

    /// Tesseract executable (name on PATH or absolute path)
    #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: String,

    /// Tesseract language code
    #[arg(long, env = "OCR_LANGUAGE", default_value = "eng")]
    pub ocr_language: String,

    /// Seconds before an OCR run is abandoned
    #[arg(long, env = "OCR_TIMEOUT_SECS", default_value_t = 60)]
    pub ocr_timeout_secs: u64,

    /// Speech language
    #[arg(long, env = "TTS_LANGUAGE", default_value = "en")]
    pub tts_language: String,

    /// Google Translate top-level domain used for speech
    #[arg(long, env = "TTS_TLD", default_value = "com")]
    pub tts_tld: String,

    /// Slow speech
    #[arg(long, env = "TTS_SLOW", default_value_t = false)]
    pub tts_slow: bool,

    /// Seconds before a synthesis request is abandoned
    #[arg(long, env = "TTS_TIMEOUT_SECS", default_value_t = 30)]
    pub tts_timeout_secs: u64,

    /// Largest accepted request body
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Number of recent clips served by /get_audio/:id
    #[arg(long, env = "AUDIO_CACHE_CAPACITY", default_value_t = 32)]
    pub audio_cache_capacity: usize,
}

impl ServerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "Detection confidence must be within [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(format!(
                "IoU threshold must be within [0, 1], got {}",
                self.iou_threshold
            ));
        }
        if self.tesseract_cmd.trim().is_empty() {
            return Err("Tesseract command must not be empty".to_string());
        }
        if self.tts_language.trim().is_empty() {
            return Err("TTS language must not be empty".to_string());
        }
        if self.ocr_timeout_secs == 0 || self.tts_timeout_secs == 0 {
            return Err("Timeouts must be greater than 0".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("Upload limit must be greater than 0".to_string());
        }
        if self.audio_cache_capacity == 0 {
            return Err("Audio cache capacity must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn listen_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Vision model settings derived from this config
    pub fn vision_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            yolo_model_path: Some(self.model_path.clone()),
            labels_path: self.labels_path.clone(),
            confidence_threshold: self.confidence_threshold,
            iou_threshold: self.iou_threshold,
            tesseract_cmd: Some(self.tesseract_cmd.clone()),
            ocr_language: self.ocr_language.clone(),
            ocr_timeout: Duration::from_secs(self.ocr_timeout_secs),
        }
    }

    /// Speech settings derived from this config
    pub fn tts_config(&self) -> TtsConfig {
        TtsConfig {
            language: self.tts_language.clone(),
            tld: self.tts_tld.clone(),
            slow: self.tts_slow,
            timeout: Duration::from_secs(self.tts_timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5019,
            static_dir: PathBuf::from("static"),
            model_path: PathBuf::from("yolov8n.onnx"),
            labels_path: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            ocr_timeout_secs: 60,
            tts_language: "en".to_string(),
            tts_tld: "com".to_string(),
            tts_slow: false,
            tts_timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            audio_cache_capacity: 32,
        }
    }
}
