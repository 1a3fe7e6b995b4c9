// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Session token lifecycle tests
//!
//! A token is accepted only while its signature verifies against the
//! process secret, it has not expired, and its email is still a known account.

use assis_detect::auth::{AuthError, AuthGate, CredentialStore, SessionClaims, TokenIssuer};
use chrono::{Duration, Utc};

const SECRET: &str = "lifecycle-secret";

fn gate_with(credentials: CredentialStore) -> AuthGate {
    AuthGate::new(credentials, TokenIssuer::new(SECRET, Duration::hours(24)))
}

#[test]
fn test_fresh_token_is_accepted() {
    let gate = gate_with(CredentialStore::with_defaults());
    let issued = gate.login("test@example.com", "123456").unwrap();

    let identity = gate.authenticate(Some(&issued.token)).unwrap();
    assert_eq!(identity.email, "test@example.com");

    let claims = gate.tokens().verify(&issued.token).unwrap();
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
    assert_eq!(claims.email, issued.email);
}

#[test]
fn test_expired_token_is_rejected() {
    let gate = gate_with(CredentialStore::with_defaults());
    let claims = SessionClaims::new(
        "test@example.com",
        Utc::now() - Duration::hours(24) - Duration::seconds(5),
        Duration::hours(24),
    );
    let token = gate.tokens().sign(&claims).unwrap();

    assert_eq!(gate.authenticate(Some(&token)), Err(AuthError::InvalidToken));
}

#[test]
fn test_token_from_another_secret_is_rejected() {
    let other = gate_with(CredentialStore::with_defaults());
    let foreign = AuthGate::new(
        CredentialStore::with_defaults(),
        TokenIssuer::new("someone-else", Duration::hours(24)),
    );
    let issued = foreign.login("test@example.com", "123456").unwrap();

    assert_eq!(
        other.authenticate(Some(&issued.token)),
        Err(AuthError::InvalidToken)
    );
}

#[test]
fn test_token_for_removed_account_is_rejected() {
    let before = gate_with(
        CredentialStore::with_extra_users(Some("temp@example.com:pw")).unwrap(),
    );
    let issued = before.login("temp@example.com", "pw").unwrap();
    assert!(before.authenticate(Some(&issued.token)).is_ok());

    // Same secret, table without the account
    let after = gate_with(CredentialStore::with_defaults());
    assert_eq!(
        after.authenticate(Some(&issued.token)),
        Err(AuthError::InvalidToken)
    );
}

#[test]
fn test_tampered_token_is_rejected() {
    let gate = gate_with(CredentialStore::with_defaults());
    let issued = gate.login("test@example.com", "123456").unwrap();

    let forged_claims = SessionClaims::new("test@example.com", Utc::now(), Duration::days(365));
    let forged = gate.tokens().sign(&forged_claims).unwrap();
    let forged_body = forged.split('.').nth(1).unwrap();

    // Original header and signature around a different payload
    let mut parts: Vec<&str> = issued.token.split('.').collect();
    parts[1] = forged_body;
    let tampered = parts.join(".");

    assert_eq!(gate.authenticate(Some(&tampered)), Err(AuthError::InvalidToken));
}
