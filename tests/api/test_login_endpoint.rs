// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Login endpoint tests
//!
//! These tests verify that POST /login:
//! - Issues a token for valid credentials and echoes the email
//! - Issues tokens that the auth gate accepts immediately
//! - Rejects wrong passwords and unknown accounts with "Invalid credentials"
//! - Treats absent fields and unreadable bodies as "Missing credentials"

use super::support::*;
use assis_detect::api::create_app;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

fn login_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_success() {
    let state = test_state(unused_detector());
    let auth = state.auth.clone();
    let app = create_app(state);

    let response = app
        .oneshot(login_request(
            json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], TEST_EMAIL);

    let token = body["token"].as_str().expect("token string");
    assert!(!token.is_empty());

    let identity = auth.authenticate(Some(token)).expect("token accepted");
    assert_eq!(identity.email, TEST_EMAIL);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_app(test_state(unused_detector()));

    let response = app
        .oneshot(login_request(
            json!({"email": TEST_EMAIL, "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": "Invalid credentials"}));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = create_app(test_state(unused_detector()));

    let response = app
        .oneshot(login_request(
            json!({"email": "nobody@example.com", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_missing_password() {
    let app = create_app(test_state(unused_detector()));

    let response = app
        .oneshot(login_request(json!({"email": TEST_EMAIL})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing credentials");
}

#[tokio::test]
async fn test_login_empty_fields() {
    let app = create_app(test_state(unused_detector()));

    let response = app
        .oneshot(login_request(json!({"email": "", "password": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing credentials");
}

#[tokio::test]
async fn test_login_without_body() {
    let app = create_app(test_state(unused_detector()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing credentials");
}

#[tokio::test]
async fn test_login_malformed_json() {
    let app = create_app(test_state(unused_detector()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Missing credentials");
}
