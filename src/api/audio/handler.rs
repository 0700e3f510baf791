// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio retrieval handlers and the shared speak-and-publish step

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::storage::AudioClip;

/// Response header carrying the id of the clip a request produced
pub const AUDIO_ID_HEADER: &str = "x-audio-id";

const AUDIO_MPEG: &str = "audio/mpeg";

/// Synthesize a sentence and publish the resulting clip
pub async fn speak(state: &AppState, sentence: &str) -> Result<AudioClip, ApiError> {
    debug!(
        "Synthesizing with {}: {:?}",
        state.synthesizer.name(),
        sentence
    );
    let audio = state.synthesizer.synthesize(sentence).await?;
    let clip = state.audio_store.publish(audio).await?;
    Ok(clip)
}

/// Add the `x-audio-id` header to a response
pub fn attach_audio_id(body: impl IntoResponse, id: Uuid) -> Response {
    ([(AUDIO_ID_HEADER, id.to_string())], body).into_response()
}

fn mpeg(bytes: Bytes) -> Response {
    ([(header::CONTENT_TYPE, AUDIO_MPEG)], bytes).into_response()
}

/// GET /get_audio - Latest published clip
///
/// # Errors
/// - 404 Not Found: nothing has been published yet
pub async fn get_audio_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let bytes = state.audio_store.latest().await?;
    info!("Serving latest audio ({} bytes)", bytes.len());
    Ok(mpeg(bytes))
}

/// GET /get_audio/:id - Clip produced by a specific request
///
/// # Errors
/// - 400 Bad Request: id is not a UUID
/// - 404 Not Found: unknown or evicted id
pub async fn get_audio_by_id_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let clip_id = Uuid::parse_str(&id).map_err(|_| ApiError::InvalidAudioId(id.clone()))?;
    let bytes = state.audio_store.get(&clip_id).await?;
    info!("Serving audio {} ({} bytes)", clip_id, bytes.len());
    Ok(mpeg(bytes))
}
