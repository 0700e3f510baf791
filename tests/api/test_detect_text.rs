// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /detect_text tests

use super::common::*;
use axum::http::StatusCode;
use evision_node::{api::AUDIO_ID_HEADER, vision::TextRecognizer};
use std::sync::Arc;
use tower::util::ServiceExt;

fn recognizer(text: &str) -> Option<Arc<dyn TextRecognizer>> {
    some_recognizer(StubRecognizer::Text(text.to_string()))
}

#[tokio::test]
async fn test_text_is_trimmed_and_spoken() {
    let app = test_app(None, recognizer("\n  Hello World  \n\x0c"));

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(AUDIO_ID_HEADER));
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"text": "Hello World", "audio": "output.mp3"})
    );
    assert_eq!(
        app.synthesizer.sentences(),
        vec!["Detected text is: Hello World".to_string()]
    );
}

#[tokio::test]
async fn test_blank_image_reports_no_readable_text() {
    let app = test_app(None, recognizer("   \n\t "));

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"text": "No readable text", "audio": "output.mp3"})
    );
    assert_eq!(
        app.synthesizer.sentences(),
        vec!["Detected text is: No readable text".to_string()]
    );
}

#[tokio::test]
async fn test_missing_image_field_is_400() {
    let app = test_app(None, recognizer("Hello"));

    let body = multipart_body("picture", "photo.png", &png_bytes());
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/detect_text", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No image uploaded");
}

#[tokio::test]
async fn test_corrupt_image_is_400() {
    let app = test_app(None, recognizer("Hello"));

    let body = multipart_body("image", "scan.png", b"\x89PNG\r\n\x1a\ntruncated");
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/detect_text", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.synthesizer.sentences().is_empty());
}

#[tokio::test]
async fn test_ocr_not_configured_is_503() {
    let app = test_app(None, None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_ocr_binary_missing_is_503() {
    let app = test_app(None, some_recognizer(StubRecognizer::Missing));

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("tesseract"));
}

#[tokio::test]
async fn test_ocr_timeout_is_504() {
    let app = test_app(None, some_recognizer(StubRecognizer::Timeout));

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_text"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "timeout");
}
