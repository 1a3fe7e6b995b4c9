// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authentication gate
//!
//! Email/password login against a fixed credential table, issuing HS256
//! session tokens that gate the detection endpoint.

pub mod credentials;
pub mod gate;
pub mod token;

use thiserror::Error;

pub use credentials::CredentialStore;
pub use gate::{bearer_token, AuthGate, Identity, IssuedToken};
pub use token::{SessionClaims, TokenIssuer};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is missing")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Failed to create token: {0}")]
    TokenCreation(String),
}
