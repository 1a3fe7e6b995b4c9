// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bearer-token guard for protected routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::errors::ApiError;
use super::http_server::AppState;
use crate::auth::bearer_token;

/// Reject the request unless it carries a valid session token
///
/// On success the caller's `Identity` is placed in the request extensions.
/// On failure the inner handler never runs, so no body is read and no image
/// is fetched.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = state.auth.authenticate(bearer_token(header))?;
    debug!("Authenticated request for {}", identity.email);

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
