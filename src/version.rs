// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the detection service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-yolov8-detection-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "jwt-login",
    "bearer-auth",
    "multipart-upload",
    "url-fetch",
    "yolov8-onnx",
];
