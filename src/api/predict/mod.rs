// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection endpoint module
//!
//! Provides POST /predict (guarded by a bearer token) and its CORS preflight.

pub mod handler;
pub mod request;

pub use handler::{predict_handler, preflight_handler};
pub use request::{ImageSource, PredictRequest};
