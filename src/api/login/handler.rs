// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Login endpoint handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::debug;

use super::request::LoginRequest;
use super::response::LoginResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::auth::AuthError;

/// POST /login - Exchange email and password for a session token
///
/// # Request
/// - `email`: Account email (required)
/// - `password`: Account password (required)
///
/// # Response
/// - `token`: HS256 session token valid for 24 hours
/// - `email`: The authenticated email
///
/// # Errors
/// - 401 Unauthorized: "Missing credentials" when the body is absent,
///   unparsable, or lacks either field
/// - 401 Unauthorized: "Invalid credentials" for an unknown email or wrong password
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Unreadable login body: {}", rejection);
            return Err(AuthError::MissingCredentials.into());
        }
    };

    let (email, password) = request.credentials();
    let issued = state.auth.login(email, password)?;

    Ok(Json(issued.into()))
}
