// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer-token authentication and ownership-based authorization for the job
//! portal API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/register` stores the user with an Argon2id password digest
//! 2. `POST /api/login` checks email and password and returns an HS256 JWT
//! 3. Clients send `Authorization: Bearer <token>` on protected routes
//! 4. The auth middleware:
//!    - Verifies signature, issuer and audience against the process secret
//!    - Rejects expired tokens (`now >= exp`, no clock skew allowance)
//!    - Places the verified claims into the request context
//! 5. Handlers read the caller identity from the claims subject only
//!
//! ## Security
//!
//! - Tokens live for one hour; there is no refresh or revocation
//! - All credential failures look identical to the client (401)
//! - Passwords, the signing secret and raw tokens are never logged

pub mod claims;
pub mod error;
pub mod issuer;
pub mod keys;
pub mod login;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod verifier;

pub use claims::Claims;
pub use error::AuthError;
pub use issuer::{ClaimsIssuer, SignedToken};
pub use keys::SigningKeys;
pub use ownership::JobCreationPolicy;
pub use password::PasswordHasher;
pub use verifier::ClaimsVerifier;
