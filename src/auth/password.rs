// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with Argon2id.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...`) carrying their own salt
//! and cost parameters, so verification works across parameter changes.

use argon2::{
    password_hash::{self, PasswordHash, SaltString},
    Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version,
};
use rand_core::OsRng;
use std::sync::{Arc, OnceLock};

use super::AuthError;

/// Plaintext behind the digest used when no stored digest exists.
const DUMMY_PASSWORD: &str = "jobportal-dummy-password";

#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_digest: Arc<OnceLock<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            dummy_digest: Arc::new(OnceLock::new()),
        }
    }

    /// Minimal work factor; only for tests.
    #[cfg(test)]
    pub fn insecure_fast() -> Self {
        Self::new(Params::new(8, 1, 1, None).expect("valid argon2 params"))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable digest is an error.
    pub fn verify(&self, digest: &str, plaintext: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingFailed(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(
        &self,
        digest: String,
        plaintext: String,
    ) -> Result<bool, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &plaintext))
            .await
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?
    }

    /// Run a full verification against a digest made with this hasher's
    /// params and discard the outcome.
    ///
    /// Used when the account does not exist so the caller pays the same
    /// Argon2 cost as for a wrong password.
    pub async fn verify_dummy_blocking(&self, plaintext: String) -> Result<(), AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || {
            let digest = match hasher.dummy_digest.get() {
                Some(digest) => digest.clone(),
                None => {
                    let digest = hasher.hash(DUMMY_PASSWORD)?;
                    hasher.dummy_digest.get_or_init(|| digest).clone()
                }
            };
            hasher.verify(&digest, &plaintext).map(|_| ())
        })
        .await
        .map_err(|e| AuthError::HashingFailed(e.to_string()))?
    }

    #[cfg(test)]
    pub(crate) fn has_dummy_digest(&self) -> bool {
        self.dummy_digest.get().is_some()
    }
}
