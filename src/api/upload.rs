// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use bytes::Bytes;
use tracing::debug;

use super::errors::ApiError;

/// Form field carrying the uploaded image
pub const IMAGE_FIELD: &str = "image";

/// Read the `image` file part from a multipart body
///
/// Other fields, and `image` parts without a file name, are skipped. A request that is not multipart at all is
/// treated the same as one without the field.
pub async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Bytes, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Request is not multipart: {}", e.body_text());
        ApiError::MissingUpload
    })?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }
        // A plain form value named `image` is not an upload
        if field.file_name().is_none() {
            debug!("Skipping non-file field {:?}", IMAGE_FIELD);
            continue;
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        debug!("Received upload: {} bytes", data.len());
        return Ok(data);
    }

    Err(ApiError::MissingUpload)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::InvalidMultipart(e.body_text())
    }
}
