// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed credential table
//!
//! Built once at startup and never mutated. Passwords are compared as
//! plaintext.

use std::collections::HashMap;

pub const DEFAULT_EMAIL: &str = "test@example.com";
pub const DEFAULT_PASSWORD: &str = "123456";

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Table containing only the built-in test account
    pub fn with_defaults() -> Self {
        Self::from_pairs([(DEFAULT_EMAIL, DEFAULT_PASSWORD)])
    }

    pub fn from_pairs<I, E, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<String>,
        P: Into<String>,
    {
        Self {
            users: pairs
                .into_iter()
                .map(|(email, password)| (email.into(), password.into()))
                .collect(),
        }
    }

    /// Default account plus any `email:password` pairs from `extra`
    ///
    /// Entries are comma separated. The password is everything after the
    /// first colon, so it may itself contain colons.
    pub fn with_extra_users(extra: Option<&str>) -> Result<Self, String> {
        let mut store = Self::with_defaults();
        let Some(list) = extra else {
            return Ok(store);
        };

        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (email, password) = entry
                .split_once(':')
                .ok_or_else(|| format!("credential entry '{}' is not email:password", entry))?;
            let email = email.trim();
            if email.is_empty() || password.is_empty() {
                return Err(format!("credential entry '{}' has an empty field", entry));
            }
            store.users.insert(email.to_string(), password.to_string());
        }

        Ok(store)
    }

    pub fn verify(&self, email: &str, password: &str) -> bool {
        self.users
            .get(email)
            .map(|stored| stored == password)
            .unwrap_or(false)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.users.contains_key(email)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
