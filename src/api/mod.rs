// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod audio;
pub mod detect_objects;
pub mod detect_text;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod upload;

pub use audio::{get_audio_by_id_handler, get_audio_handler, AUDIO_ID_HEADER};
pub use detect_objects::{detect_objects_handler, DetectObjectsResponse};
pub use detect_text::{detect_text_handler, DetectTextResponse};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, home_handler, HealthResponse, LIVENESS_MESSAGE};
pub use http_server::{create_app, start_server, AppState};
pub use upload::{read_image_field, IMAGE_FIELD};
