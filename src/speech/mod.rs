// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text-to-speech for spoken results
//!
//! Components:
//! - `google` - Google Translate TTS client (the backend gTTS talks to)
//! - `text` - Splitting long text into request-sized chunks

pub mod google;
pub mod text;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use google::{extract_audio, objects_sentence, package_rpc, text_sentence, GoogleTts};
pub use text::{chunk_text, MAX_CHUNK_CHARS};

/// Errors from the speech synthesizer
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Nothing to synthesize")]
    EmptyText,

    #[error("TTS request failed: {0}")]
    Network(String),

    #[error("TTS API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("TTS request timed out after {0}s")]
    Timeout(u64),

    #[error("TTS response contained no audio")]
    NoAudio,

    #[error("TTS audio payload is invalid: {0}")]
    InvalidPayload(String),
}

/// Speech synthesis settings
#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// Language code (e.g. "en")
    pub language: String,
    /// Google Translate top-level domain (e.g. "com", "co.uk")
    pub tld: String,
    /// Slow speech
    pub slow: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            tld: "com".to_string(),
            slow: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Speech synthesizer seam used by the request handlers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize text, returning MP3 audio
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
