// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for HTTP tests: a mocked detector, app state, and request bodies

use assis_detect::{
    api::AppState,
    auth::{AuthGate, CredentialStore, TokenIssuer},
    config::FetchConfig,
    vision::{Detection, DetectionError, Detector, ImageAcquirer},
};
use axum::{body::Body, http::Response};
use image::{DynamicImage, ImageFormat, RgbImage};
use mockall::mock;
use std::io::Cursor;
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "123456";
pub const BOUNDARY: &str = "----assis-test-boundary";

mock! {
    pub Detector {}

    impl Detector for Detector {
        fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>, DetectionError>;
    }
}

pub fn test_auth() -> AuthGate {
    AuthGate::new(
        CredentialStore::with_defaults(),
        TokenIssuer::new(TEST_SECRET, chrono::Duration::hours(24)),
    )
}

pub fn test_state(detector: MockDetector) -> AppState {
    let acquirer = ImageAcquirer::new(&FetchConfig {
        timeout_secs: 5,
        ..Default::default()
    })
    .expect("client");

    AppState::new(test_auth(), acquirer, Arc::new(detector), "yolov8n")
}

/// Detector that must never be reached
pub fn unused_detector() -> MockDetector {
    let mut detector = MockDetector::new();
    detector.expect_detect().times(0);
    detector
}

pub fn login_token(state: &AppState) -> String {
    state
        .auth
        .login(TEST_EMAIL, TEST_PASSWORD)
        .expect("login")
        .token
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30])));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

pub fn multipart_body(field: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"image.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json body")
}
