// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration
//!
//! Every setting comes from the environment (a `.env` file is honoured by the
//! binary), with CLI flags layered on top in `main`.

pub mod detector;
pub mod fetch;
pub mod server;

pub use detector::DetectorConfig;
pub use fetch::FetchConfig;
pub use server::ServerConfig;

/// Parse an optional string value, falling back to `default` when absent or unparsable
pub(crate) fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// "true"/"1" (any case) is true, everything else false
pub(crate) fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(false)
}
