// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection endpoint handler

use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Extension, Json,
};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{debug, info};

use super::request::{ImageSource, PredictRequest, FILE_FIELD};
use crate::api::errors::ApiError;
use crate::api::http_server::{AppState, MAX_REQUEST_BODY};
use crate::auth::Identity;
use crate::vision::Detection;

/// POST /predict - Detect objects in an image
///
/// Requires `Authorization: Bearer <token>`; the guard has already placed the
/// caller's `Identity` in the request extensions.
///
/// # Request
/// - multipart/form-data with a `file` field holding image bytes, or
/// - application/json `{"url": "https://..."}`
///
/// The upload wins when both could apply.
///
/// # Response
/// JSON array of detections, each `{class_id, class_name, confidence, bbox}`
/// in original image pixels.
///
/// # Errors
/// - 400 Bad Request: no image supplied, or a malformed body
/// - 401 Unauthorized: missing or invalid token (from the guard)
/// - 500 Internal Server Error: fetch, decode, or detection failure
pub async fn predict_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    request: Request,
) -> Result<Json<Vec<Detection>>, ApiError> {
    let start = Instant::now();

    let source = read_image_source(request, &state).await?;

    let decoded = match source {
        ImageSource::Upload(bytes) => {
            debug!("Predict upload of {} bytes from {}", bytes.len(), identity.email);
            state.acquirer.from_upload(&bytes)?
        }
        ImageSource::Url(url) => {
            debug!("Predict url {} from {}", url, identity.email);
            state.acquirer.from_url(&url).await?
        }
    };

    let (width, height) = (decoded.width(), decoded.height());
    let detector = state.detector.clone();
    let image = decoded.image;

    // Inference is CPU bound
    let detections = tokio::task::spawn_blocking(move || detector.detect(&image))
        .await
        .map_err(|e| ApiError::Internal(format!("detection task failed: {}", e)))??;

    info!(
        "Detected {} objects in {}x{} image for {} ({}ms)",
        detections.len(),
        width,
        height,
        identity.email,
        start.elapsed().as_millis()
    );

    Ok(Json(detections))
}

/// OPTIONS /predict - CORS preflight, no authentication
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

/// Pick the image source: a multipart `file` field, else a JSON `url`
async fn read_image_source(request: Request, state: &AppState) -> Result<ImageSource, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
        {
            if field.name() == Some(FILE_FIELD) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                return Ok(ImageSource::Upload(bytes.to_vec()));
            }
        }

        return Err(ApiError::MissingInput);
    }

    if content_type.starts_with("application/json") {
        let body = axum::body::to_bytes(request.into_body(), MAX_REQUEST_BODY)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let predict = PredictRequest::from_json(&body)?;

        return predict
            .url()
            .map(|url| ImageSource::Url(url.to_string()))
            .ok_or(ApiError::MissingInput);
    }

    Err(ApiError::MissingInput)
}
