// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Translate TTS client
//!
//! Speaks the same undocumented `batchexecute` protocol as gTTS: each text
//! chunk is posted as an `f.req` form field and the MP3 comes back base64
//! encoded inside a JSON-ish line. Chunks are fetched in order and their
//! MP3 frames concatenated.

use std::sync::OnceLock;
use std::time::Instant;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info};

use super::text::{chunk_text, MAX_CHUNK_CHARS};
use super::{SpeechSynthesizer, TtsConfig, TtsError};

/// RPC id of the TTS call
const RPC_ID: &str = "jQ1olc";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/47.0.2526.106 Safari/537.36";

fn audio_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"jQ1olc","\[\\"(.*)\\"]"#).expect("static TTS regex is valid")
    })
}

/// Build the `f.req` form value for one chunk
pub fn package_rpc(text: &str, language: &str, slow: bool) -> String {
    let parameter = serde_json::json!([
        text,
        language,
        if slow { serde_json::Value::Bool(true) } else { serde_json::Value::Null },
        "null"
    ]);
    let rpc = serde_json::json!([[[RPC_ID, parameter.to_string(), null, "generic"]]]);
    rpc.to_string()
}

/// Pull the base64 MP3 out of a `batchexecute` response body
pub fn extract_audio(body: &str) -> Result<Vec<u8>, TtsError> {
    for line in body.lines().filter(|l| l.contains(RPC_ID)) {
        if let Some(captures) = audio_pattern().captures(line) {
            let encoded = &captures[1];
            return STANDARD
                .decode(encoded)
                .map_err(|e| TtsError::InvalidPayload(e.to_string()));
        }
    }
    Err(TtsError::NoAudio)
}

/// Sentence spoken after object detection
pub fn objects_sentence(labels: &[String]) -> String {
    format!("Detected objects are: {}", labels.join(", "))
}

/// Sentence spoken after text recognition
pub fn text_sentence(text: &str) -> String {
    format!("Detected text is: {}", text)
}

/// Speech synthesizer backed by translate.google.<tld>
pub struct GoogleTts {
    client: Client,
    config: TtsConfig,
    endpoint: String,
}

impl GoogleTts {
    /// Create a client for the configured language and domain
    pub fn new(config: TtsConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TtsError::Network(e.to_string()))?;

        let endpoint = format!(
            "https://translate.google.{}/_/TranslateWebserverUi/data/batchexecute",
            config.tld
        );
        info!(
            "TTS client configured: endpoint={}, lang={}, slow={}",
            endpoint, config.language, config.slow
        );

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Point the client at a different `batchexecute` URL
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &TtsConfig {
        &self.config
    }

    async fn synthesize_chunk(&self, chunk: &str) -> Result<Vec<u8>, TtsError> {
        let form = [(
            "f.req",
            package_rpc(chunk, &self.config.language, self.config.slow),
        )];

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::REFERER,
                format!("https://translate.google.{}/", self.config.tld),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string();
            return Err(TtsError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        extract_audio(&body)
    }

    fn classify(&self, e: reqwest::Error) -> TtsError {
        if e.is_timeout() {
            TtsError::Timeout(self.config.timeout.as_secs())
        } else {
            TtsError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let start = Instant::now();
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let mut audio = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            debug!("TTS chunk {}/{}: {} chars", i + 1, chunks.len(), chunk.len());
            audio.extend(self.synthesize_chunk(chunk).await?);
        }

        info!(
            "TTS complete: {} chunks, {} bytes, {}ms",
            chunks.len(),
            audio.len(),
            start.elapsed().as_millis()
        );

        Ok(audio)
    }

    fn name(&self) -> &str {
        "google-translate-tts"
    }
}
