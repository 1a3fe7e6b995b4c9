// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Multipart field carrying an uploaded image
pub const FILE_FIELD: &str = "file";

/// JSON body naming a remote image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl PredictRequest {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(bytes).map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    /// The requested URL, if present and non-blank
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Where the image for one predict call comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    Upload(Vec<u8>),
    Url(String),
}
