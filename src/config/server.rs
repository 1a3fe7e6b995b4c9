// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server and authentication settings

use std::env;
use std::net::SocketAddr;

use super::{parse_flag, parse_or};

/// Signing secret used when `SECRET_KEY` is not provided
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-here";

/// Session tokens live for 24 hours
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Configuration for the HTTP surface and the auth gate
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: 0.0.0.0)
    pub host: String,
    /// Bind port (default: 5000)
    pub port: u16,
    /// Verbose logging (default: false)
    pub debug: bool,
    /// HS256 signing secret for session tokens
    pub secret_key: String,
    /// Session token lifetime in hours (default: 24)
    pub token_ttl_hours: i64,
    /// Extra credentials as `email:password` pairs separated by commas
    pub auth_users: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("BACKEND_HOST").unwrap_or(defaults.host),
            // PORT wins over BACKEND_PORT
            port: parse_or(
                lookup("PORT").or_else(|| lookup("BACKEND_PORT")),
                defaults.port,
            ),
            debug: parse_flag(lookup("BACKEND_DEBUG")),
            secret_key: lookup("SECRET_KEY")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.secret_key),
            token_ttl_hours: parse_or(lookup("TOKEN_TTL_HOURS"), defaults.token_ttl_hours),
            auth_users: lookup("AUTH_USERS").filter(|s| !s.trim().is_empty()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.secret_key.is_empty() {
            return Err("secret_key must not be empty".to_string());
        }
        if self.token_ttl_hours <= 0 {
            return Err("token_ttl_hours must be at least 1".to_string());
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Whether the well-known default secret is in use
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            auth_users: None,
        }
    }
}
