// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! These tests verify that:
//! - The liveness route answers with the plain-text banner
//! - /health reports analyzer availability
//! - The analysis routes only accept POST
//! - Unknown routes are 404

use super::common::*;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tower::util::ServiceExt;

#[tokio::test]
async fn test_home_route() {
    let app = test_app(None, None);

    let response = app.router.clone().oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let body = body_bytes(response).await;
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "eVision server is running with YOLOv8 and Tesseract OCR!"
    );
}

#[tokio::test]
async fn test_health_degraded_without_analyzers() {
    let app = test_app(None, None);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["detector"], false);
    assert_eq!(json["ocr"], false);
    assert_eq!(json["issues"].as_array().unwrap().len(), 2);
    assert_eq!(json["version"], evision_node::version::VERSION_NUMBER);
    assert_eq!(
        json["features"].as_array().unwrap().len(),
        evision_node::version::FEATURES.len()
    );
}

#[tokio::test]
async fn test_health_with_analyzers() {
    let app = test_app(
        some_detector(StubDetector::with_labels(&[])),
        some_recognizer(StubRecognizer::Text(String::new())),
    );

    let response = app
        .router
        .clone()
        .oneshot(get_request("/health"))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["detector"], true);
    assert_eq!(json["ocr"], true);
    assert!(json["issues"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analysis_routes_reject_get() {
    let app = test_app(None, None);

    for uri in ["/detect_objects", "/detect_text"] {
        let response = app.router.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
    }
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app(None, None);

    let response = app
        .router
        .clone()
        .oneshot(get_request("/v1/inference"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let app = test_app(None, None);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
