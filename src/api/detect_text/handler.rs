// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition endpoint handler

use std::time::Instant;

use axum::{extract::State, response::Response, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info};

use super::response::DetectTextResponse;
use crate::api::audio::{attach_audio_id, speak};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::upload::read_image_field;
use crate::speech::text_sentence;
use crate::vision::{decode_image_bytes, normalize_text};

/// POST /detect_text - Read the text in an uploaded image
///
/// Takes a multipart form with an `image` field, runs OCR, speaks
/// "Detected text is: ..." and publishes the audio.
///
/// # Response
/// - `text`: trimmed text, or "No readable text"
/// - `audio`: always "output.mp3"
/// - header `x-audio-id`: id for GET /get_audio/:id
///
/// # Errors
/// - 400 Bad Request: missing `image` field or undecodable image
/// - 503 Service Unavailable: OCR binary not available
/// - 500 Internal Server Error: OCR process failed
/// - 504 Gateway Timeout: OCR or speech backend timed out
pub async fn detect_text_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let data = read_image_field(multipart).await?;

    let recognizer = state
        .vision
        .get_recognizer()
        .ok_or_else(|| ApiError::ServiceUnavailable("OCR engine not available".to_string()))?;

    let image = tokio::task::spawn_blocking(move || decode_image_bytes(&data))
        .await
        .map_err(|e| ApiError::InternalError(format!("Image decode task failed: {}", e)))??
        .0;
    debug!("Decoded image: {}x{}", image.width(), image.height());

    let raw = recognizer.recognize(&image).await?;
    let text = normalize_text(&raw);
    let clip = speak(&state, &text_sentence(&text)).await?;

    info!(
        "Recognized {} chars with {} in {}ms",
        text.len(),
        recognizer.name(),
        start.elapsed().as_millis()
    );

    Ok(attach_audio_id(Json(DetectTextResponse::new(text)), clip.id))
}
