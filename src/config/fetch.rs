// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for fetching images by URL

use std::env;

use super::parse_or;

/// Configuration for remote image fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Maximum redirects followed (default: 5)
    pub max_redirects: usize,
    /// User agent sent with fetches
    pub user_agent: String,
}

impl FetchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: parse_or(env::var("FETCH_TIMEOUT_SECS").ok(), defaults.timeout_secs),
            max_redirects: parse_or(env::var("FETCH_MAX_REDIRECTS").ok(), defaults.max_redirects),
            user_agent: defaults.user_agent,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
            user_agent: format!("assis-detect/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
