// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::error::ApiError;

/// Authentication and authorization error type.
///
/// Every credential failure renders the same 401 body; the variant is only
/// visible in server logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header is required")]
    MissingAuthHeader,

    #[error("invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,

    #[error("token is malformed")]
    MalformedToken,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    TokenExpired,

    #[error("token issuer is invalid")]
    InvalidIssuer,

    #[error("token audience is invalid")]
    InvalidAudience,

    /// Unknown email or wrong password; the two are not distinguished.
    #[error("invalid credentials")]
    CredentialsInvalid,

    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("token signing failed: {0}")]
    SigningFailed(String),

    #[error("token signing key is not configured")]
    MissingSigningKey,

    /// Identity is valid but the operation is not permitted for it.
    #[error("user {user_id} may not {action}")]
    AuthorizationDenied { user_id: u64, action: &'static str },
}

impl AuthError {
    /// Whether the error describes a bad or absent credential.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::MissingAuthHeader
                | AuthError::InvalidAuthHeader
                | AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::InvalidIssuer
                | AuthError::InvalidAudience
                | AuthError::CredentialsInvalid
        )
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthorizationDenied { .. } => ApiError::forbidden(),
            AuthError::HashingFailed(_)
            | AuthError::SigningFailed(_)
            | AuthError::MissingSigningKey => ApiError::internal(),
            _ => ApiError::unauthorized(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
