// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::vision::{AcquisitionError, DetectionError};

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(AuthError),

    #[error("No image provided. Send file or url.")]
    MissingInput,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("Error processing image")]
    Detection(#[from] DetectionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation(msg) => ApiError::Internal(msg),
            other => ApiError::Auth(other),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Auth(_) => 401,
            ApiError::MissingInput | ApiError::InvalidRequest(_) => 400,
            ApiError::Acquisition(_) | ApiError::Detection(_) | ApiError::Internal(_) => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            ApiError::Detection(source) => error!("Detection failed: {}", source),
            e if status.is_server_error() => error!("Request failed: {}", e),
            e => warn!("Request rejected: {}", e),
        }

        (status, Json(self.to_response())).into_response()
    }
}
