// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::speech::TtsError;
use crate::storage::StoreError;
use crate::vision::{DetectionError, ImageError, OcrError};

/// Message returned when the `image` field is absent
pub const MISSING_UPLOAD_MESSAGE: &str = "No image uploaded";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MissingUpload,
    InvalidMultipart(String),
    InvalidImage(String),
    PayloadTooLarge(String),
    InvalidAudioId(String),
    NotFound(String),
    ServiceUnavailable(String),
    UpstreamError(String),
    Timeout(String),
    InternalError(String),
}

impl ApiError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::MissingUpload => "missing_upload",
            ApiError::InvalidMultipart(_) => "invalid_multipart",
            ApiError::InvalidImage(_) => "invalid_image",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::InvalidAudioId(_) => "invalid_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::UpstreamError(_) => "upstream_error",
            ApiError::Timeout(_) => "timeout",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error, details) = match self {
            ApiError::MissingUpload => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(crate::api::upload::IMAGE_FIELD.to_string()),
                );
                (MISSING_UPLOAD_MESSAGE.to_string(), Some(details))
            }
            ApiError::InvalidAudioId(id) => {
                let mut details = HashMap::new();
                details.insert("id".to_string(), serde_json::Value::String(id.clone()));
                ("Invalid audio id".to_string(), Some(details))
            }
            ApiError::InvalidMultipart(msg)
            | ApiError::InvalidImage(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::UpstreamError(msg)
            | ApiError::Timeout(msg)
            | ApiError::InternalError(msg) => (msg.clone(), None),
        };

        ErrorResponse {
            error,
            error_type: self.error_type().to_string(),
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingUpload
            | ApiError::InvalidMultipart(_)
            | ApiError::InvalidImage(_)
            | ApiError::InvalidAudioId(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalError(_) => 500,
            ApiError::UpstreamError(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::Timeout(_) => 504,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingUpload => write!(f, "{}", MISSING_UPLOAD_MESSAGE),
            ApiError::InvalidMultipart(msg) => write!(f, "Invalid multipart body: {}", msg),
            ApiError::InvalidImage(msg) => write!(f, "Invalid image: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::InvalidAudioId(id) => write!(f, "Invalid audio id: {}", id),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("❌ {} ({})", self, status);
        } else {
            tracing::warn!("⚠️ {} ({})", self, status);
        }

        (status, Json(self.to_response())).into_response()
    }
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::TooLarge(..) => ApiError::PayloadTooLarge(e.to_string()),
            ImageError::EncodeFailed(_) => ApiError::InternalError(e.to_string()),
            _ => ApiError::InvalidImage(e.to_string()),
        }
    }
}

impl From<DetectionError> for ApiError {
    fn from(e: DetectionError) -> Self {
        match e {
            DetectionError::ModelNotFound(_) | DetectionError::LoadFailed(_) => {
                ApiError::ServiceUnavailable(e.to_string())
            }
            _ => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<OcrError> for ApiError {
    fn from(e: OcrError) -> Self {
        match e {
            OcrError::BinaryNotFound(_) => ApiError::ServiceUnavailable(e.to_string()),
            OcrError::Timeout(_) => ApiError::Timeout(e.to_string()),
            _ => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<TtsError> for ApiError {
    fn from(e: TtsError) -> Self {
        match e {
            TtsError::Timeout(_) => ApiError::Timeout(e.to_string()),
            TtsError::EmptyText => ApiError::InternalError(e.to_string()),
            _ => ApiError::UpstreamError(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::Io(_) => ApiError::InternalError(e.to_string()),
        }
    }
}
