// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claims issuer: mints HS256 bearer tokens after a successful login.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, Header};

use super::{claims::Claims, keys::SigningKeys, AuthError};
use crate::config::{TOKEN_AUDIENCE, TOKEN_TTL_SECS};
use crate::models::UserId;

/// A freshly minted token together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub claims: Claims,
}

#[derive(Debug, Clone)]
pub struct ClaimsIssuer {
    keys: SigningKeys,
    issuer: String,
    ttl: Duration,
}

impl ClaimsIssuer {
    pub fn new(keys: SigningKeys, issuer: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            ttl: Duration::seconds(TOKEN_TTL_SECS),
        }
    }

    /// Mint a token for `user_id` valid from `now` for one hour.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<SignedToken, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: vec![TOKEN_AUDIENCE.to_string()],
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| AuthError::SigningFailed(e.to_string()))?;

        Ok(SignedToken { token, claims })
    }
}
