// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod speech;
pub mod storage;
pub mod version;
pub mod vision;

pub use api::http_server::{create_app, AppState};
pub use config::ServerConfig;
pub use speech::{GoogleTts, SpeechSynthesizer, TtsConfig, TtsError};
pub use storage::{AudioClip, AudioStore, StoreError};
pub use vision::{
    ObjectDetector, TextRecognizer, VisionModelConfig, VisionModelInfo, VisionModelManager,
};
