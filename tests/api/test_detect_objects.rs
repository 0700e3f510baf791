// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /detect_objects tests
//!
//! Covers the response shape, label collection, the spoken sentence and
//! the error statuses of the upload and detection paths.

use super::common::*;
use axum::http::StatusCode;
use evision_node::{api::AUDIO_ID_HEADER, vision::ObjectDetector};
use std::collections::HashSet;
use std::sync::Arc;
use tower::util::ServiceExt;

fn detector(labels: &[(&str, f32)]) -> Option<Arc<dyn ObjectDetector>> {
    some_detector(StubDetector::with_labels(labels))
}

#[tokio::test]
async fn test_no_detections_reports_unknown_object() {
    let app = test_app(detector(&[]), None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"objects": ["unknown object"], "audio": "output.mp3"})
    );
    assert_eq!(
        app.synthesizer.sentences(),
        vec!["Detected objects are: unknown object".to_string()]
    );
}

#[tokio::test]
async fn test_labels_are_deduplicated() {
    let app = test_app(
        detector(&[("cat", 0.9), ("dog", 0.8), ("cat", 0.4), ("dog", 0.2)]),
        None,
    );

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let objects: HashSet<String> = json["objects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(objects, HashSet::from(["cat".to_string(), "dog".to_string()]));
    assert_eq!(json["objects"].as_array().unwrap().len(), 2);
    assert_eq!(json["audio"], "output.mp3");
}

#[tokio::test]
async fn test_sentence_lists_labels_by_confidence() {
    let app = test_app(detector(&[("dog", 0.3), ("person", 0.95), ("cat", 0.6)]), None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        app.synthesizer.sentences(),
        vec!["Detected objects are: person, cat, dog".to_string()]
    );
}

#[tokio::test]
async fn test_audio_is_published_with_id_header() {
    let app = test_app(detector(&[("cat", 0.9)]), None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let id = response.headers()[AUDIO_ID_HEADER]
        .to_str()
        .unwrap()
        .parse::<uuid::Uuid>()
        .unwrap();
    let expected = fake_mp3("Detected objects are: cat");
    assert_eq!(app.store.get(&id).await.unwrap().to_vec(), expected);
    assert_eq!(app.store.latest().await.unwrap().to_vec(), expected);
    assert!(app.static_dir.path().join("output.mp3").exists());
}

#[tokio::test]
async fn test_missing_image_field_is_400() {
    let app = test_app(detector(&[("cat", 0.9)]), None);

    let body = multipart_body("file", "photo.png", &png_bytes());
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/detect_objects", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No image uploaded");
    assert_eq!(json["error_type"], "missing_upload");
    assert!(app.synthesizer.sentences().is_empty());
}

#[tokio::test]
async fn test_image_text_value_is_not_an_upload() {
    let app = test_app(detector(&[("cat", 0.9)]), None);

    let body = text_field_body("image", "photo.png");
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/detect_objects", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "missing_upload");
    assert!(app.synthesizer.sentences().is_empty());
}

#[tokio::test]
async fn test_non_multipart_request_is_400() {
    let app = test_app(detector(&[("cat", 0.9)]), None);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/detect_objects")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_corrupt_image_is_400() {
    let app = test_app(detector(&[("cat", 0.9)]), None);

    let body = multipart_body("image", "photo.jpg", b"definitely not an image");
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/detect_objects", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "invalid_image");
    assert!(app.store.latest().await.is_err());
}

#[tokio::test]
async fn test_oversized_upload_is_413() {
    let synthesizer = Arc::new(RecordingSynthesizer::default());
    let (state, _store, _dir) = state_with(detector(&[("cat", 0.9)]), None, synthesizer);
    let router =
        evision_node::api::http_server::create_app(state.with_max_upload_bytes(1024));

    let body = multipart_body("image", "big.png", &vec![0u8; 4096]);
    let response = router
        .oneshot(multipart_request("/detect_objects", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_detector_not_loaded_is_503() {
    let app = test_app(None, None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "service_unavailable");
}

#[tokio::test]
async fn test_inference_failure_is_500() {
    let app = test_app(some_detector(FailingDetector), None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_speech_backend_down_is_502() {
    let (state, store, _dir) = state_with(
        detector(&[("cat", 0.9)]),
        None,
        Arc::new(DownSynthesizer),
    );
    let router = evision_node::api::http_server::create_app(state);

    let response = router
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error_type"], "upstream_error");
    assert!(store.latest().await.is_err());
}
