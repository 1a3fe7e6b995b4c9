// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use tracing::{info, warn};

use super::{AuthError, CredentialStore, TokenIssuer};

/// Authenticated caller attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub email: String,
}

/// Extract the token from an `Authorization` header value
///
/// A leading `"Bearer "` is removed; an empty remainder counts as no token.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Credential check plus token issue/verify, shared read-only across requests
#[derive(Clone)]
pub struct AuthGate {
    credentials: CredentialStore,
    tokens: TokenIssuer,
}

impl AuthGate {
    pub fn new(credentials: CredentialStore, tokens: TokenIssuer) -> Self {
        Self {
            credentials,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if !self.credentials.verify(email, password) {
            warn!("Login rejected for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let claims = self.tokens.claims_for(email);
        let token = self.tokens.sign(&claims)?;
        info!("Issued session token for {}", email);

        Ok(IssuedToken {
            token,
            email: email.to_string(),
        })
    }

    /// Validate a bearer token; the embedded email must still be in the table
    pub fn authenticate(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        if !self.credentials.contains(&claims.email) {
            warn!("Token for unknown account {}", claims.email);
            return Err(AuthError::InvalidToken);
        }

        Ok(Identity {
            email: claims.email,
        })
    }
}
