// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod health;
pub mod http_server;
pub mod login;
pub mod middleware;
pub mod predict;

pub use errors::{ApiError, ErrorResponse};
pub use health::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState, MAX_REQUEST_BODY};
pub use login::{login_handler, LoginRequest, LoginResponse};
pub use middleware::require_identity;
pub use predict::{predict_handler, preflight_handler, PredictRequest};
