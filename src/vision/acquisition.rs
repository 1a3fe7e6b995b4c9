// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image acquisition from uploads and remote URLs
//!
//! Both paths end in [`decode_image_bytes`]; the URL path first fetches the
//! payload with a bounded timeout.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::image_utils::{decode_image_bytes, DecodedImage, ImageError, MAX_IMAGE_SIZE};
use crate::config::FetchConfig;

/// Remote fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or uses an unsupported scheme
    #[error("Invalid image URL '{0}': {1}")]
    InvalidUrl(String, String),
    /// Request timed out
    #[error("Timeout fetching: {0}")]
    Timeout(String),
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),
    /// HTTP non-success status
    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),
}

/// Any failure between "request named an image" and "pixels in memory"
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] ImageError),
}

/// Obtains decoded images for the predict endpoint.
///
/// Holds one shared HTTP client so connection pools are reused across requests.
#[derive(Debug, Clone)]
pub struct ImageAcquirer {
    client: Client,
}

impl ImageAcquirer {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Decode an uploaded payload
    pub fn from_upload(&self, bytes: &[u8]) -> Result<DecodedImage, AcquisitionError> {
        let image = decode_image_bytes(bytes)?;
        debug!(
            "Decoded upload: {}x{} {:?}, {} bytes",
            image.info.width, image.info.height, image.info.format, image.info.size_bytes
        );
        Ok(image)
    }

    /// Fetch an image over HTTP(S) and decode it
    pub async fn from_url(&self, url: &str) -> Result<DecodedImage, AcquisitionError> {
        let parsed = parse_image_url(url)?;

        debug!("Fetching image from: {}", parsed);

        let mut response = self.client.get(parsed.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16(), url.to_string()).into());
        }

        if let Some(length) = response.content_length() {
            if length as usize > MAX_IMAGE_SIZE {
                return Err(ImageError::TooLarge(length as usize, MAX_IMAGE_SIZE).into());
            }
        }

        // Stop reading once the cap is passed; chunked bodies carry no length
        let mut bytes = Vec::with_capacity(
            response
                .content_length()
                .map(|len| len as usize)
                .unwrap_or(0)
                .min(MAX_IMAGE_SIZE),
        );
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Http(e.to_string())
            }
        })? {
            if bytes.len() + chunk.len() > MAX_IMAGE_SIZE {
                return Err(ImageError::TooLarge(bytes.len() + chunk.len(), MAX_IMAGE_SIZE).into());
            }
            bytes.extend_from_slice(&chunk);
        }

        let image = decode_image_bytes(&bytes)?;
        info!(
            "Fetched {}x{} image ({} bytes) from {}",
            image.info.width, image.info.height, image.info.size_bytes, parsed
        );
        Ok(image)
    }
}

/// Only absolute http/https URLs are fetched
fn parse_image_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| FetchError::InvalidUrl(url.to_string(), e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(
            url.to_string(),
            format!("unsupported scheme '{}'", other),
        )),
    }
}
