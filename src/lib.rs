// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, start_server, ApiError, AppState};
pub use auth::{AuthError, AuthGate, CredentialStore, Identity, TokenIssuer};
pub use config::{DetectorConfig, FetchConfig, ServerConfig};
pub use vision::{
    Detection, DetectionError, Detector, ImageAcquirer, YoloDetector, YoloParams,
};
