// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection endpoint handler

use std::time::Instant;

use axum::{extract::State, response::Response, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info};

use super::response::DetectObjectsResponse;
use crate::api::audio::{attach_audio_id, speak};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::upload::read_image_field;
use crate::speech::objects_sentence;
use crate::vision::{collect_labels, decode_image_bytes};

/// POST /detect_objects - Name the objects in an uploaded image
///
/// Takes a multipart form with an `image` field, runs the object detector,
/// speaks "Detected objects are: ..." and publishes the audio.
///
/// # Response
/// - `objects`: unique labels, or `["unknown object"]` when nothing is found
/// - `audio`: always "output.mp3"
/// - header `x-audio-id`: id for GET /get_audio/:id
///
/// # Errors
/// - 400 Bad Request: missing `image` field or undecodable image
/// - 413 Payload Too Large: upload exceeds the body limit
/// - 503 Service Unavailable: detection model not loaded
/// - 502/504: speech backend failure or timeout
pub async fn detect_objects_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let start = Instant::now();
    let data = read_image_field(multipart).await?;

    let detector = state.vision.get_detector().ok_or_else(|| {
        ApiError::ServiceUnavailable("Object detection model not loaded".to_string())
    })?;

    let detections = tokio::task::spawn_blocking(move || {
        let (image, image_info) = decode_image_bytes(&data)?;
        debug!(
            "Decoded image: {}x{} {:?}, {} bytes",
            image_info.width, image_info.height, image_info.format, image_info.size_bytes
        );
        Ok::<_, ApiError>(detector.detect(&image)?)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Detection task failed: {}", e)))??;

    let objects = collect_labels(&detections);
    let clip = speak(&state, &objects_sentence(&objects)).await?;

    info!(
        "Detected {} objects ({} boxes) in {}ms: {:?}",
        objects.len(),
        detections.len(),
        start.elapsed().as_millis(),
        objects
    );

    Ok(attach_audio_id(
        Json(DetectObjectsResponse::new(objects)),
        clip.id,
    ))
}
