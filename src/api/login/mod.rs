// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Login endpoint module
//!
//! Provides POST /login for exchanging credentials for a session token.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::login_handler;
pub use request::LoginRequest;
pub use response::LoginResponse;
