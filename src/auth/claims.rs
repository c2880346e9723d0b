// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims carried by bearer tokens.

use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Claims of a token issued by this service.
///
/// Never persisted: rebuilt from the token on every protected request and
/// dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer (the configured service name)
    pub iss: String,

    /// Subject: the user id in decimal form
    pub sub: String,

    /// Audience
    pub aud: Vec<String>,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// A token is valid only strictly before its expiry.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}
