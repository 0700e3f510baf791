// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /get_audio and GET /get_audio/:id tests

use super::common::*;
use axum::http::{header, StatusCode};
use evision_node::api::AUDIO_ID_HEADER;
use tower::util::ServiceExt;

#[tokio::test]
async fn test_get_audio_before_any_publish_is_404() {
    let app = test_app(None, None);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/get_audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json.get("error").is_some());
    assert_eq!(json["error_type"], "not_found");
}

#[tokio::test]
async fn test_get_audio_after_detection() {
    let app = test_app(some_detector(StubDetector::with_labels(&[("cat", 0.9)])), None);

    let response = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/get_audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    let audio = body_bytes(response).await;
    assert!(!audio.is_empty());
    assert_eq!(audio, fake_mp3("Detected objects are: cat"));
}

#[tokio::test]
async fn test_latest_audio_follows_last_request() {
    let app = test_app(
        some_detector(StubDetector::with_labels(&[("dog", 0.7)])),
        some_recognizer(StubRecognizer::Text("STOP".to_string())),
    );

    for uri in ["/detect_objects", "/detect_text"] {
        let response = app.router.clone().oneshot(image_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .router
        .clone()
        .oneshot(get_request("/get_audio"))
        .await
        .unwrap();
    assert_eq!(
        body_bytes(response).await,
        fake_mp3("Detected text is: STOP")
    );
}

#[tokio::test]
async fn test_get_audio_by_id_returns_own_clip() {
    let app = test_app(
        some_detector(StubDetector::with_labels(&[("dog", 0.7)])),
        some_recognizer(StubRecognizer::Text("STOP".to_string())),
    );

    let first = app
        .router
        .clone()
        .oneshot(image_request("/detect_objects"))
        .await
        .unwrap();
    let first_id = first.headers()[AUDIO_ID_HEADER]
        .to_str()
        .unwrap()
        .to_string();

    // A later request replaces output.mp3
    let second = app
        .router
        .clone()
        .oneshot(image_request("/detect_text"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(get_request(&format!("/get_audio/{}", first_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(
        body_bytes(response).await,
        fake_mp3("Detected objects are: dog")
    );
}

#[tokio::test]
async fn test_get_audio_by_unknown_id_is_404() {
    let app = test_app(None, None);

    let uri = format!("/get_audio/{}", uuid::Uuid::new_v4());
    let response = app.router.clone().oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_audio_by_malformed_id_is_400() {
    let app = test_app(None, None);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/get_audio/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["details"]["id"], "not-a-uuid");
}
