// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use crate::auth::{
    AuthError, ClaimsIssuer, ClaimsVerifier, JobCreationPolicy, PasswordHasher, SigningKeys,
};
use crate::config::AppConfig;
use crate::storage::Store;

/// Shared handler state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: PasswordHasher,
    pub issuer: ClaimsIssuer,
    pub verifier: ClaimsVerifier,
    pub job_policy: JobCreationPolicy,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: SigningKeys, issuer: &str) -> Self {
        Self {
            store,
            hasher: PasswordHasher::default(),
            issuer: ClaimsIssuer::new(keys.clone(), issuer),
            verifier: ClaimsVerifier::new(keys, issuer),
            job_policy: JobCreationPolicy::default(),
            request_timeout: Duration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Build the state from loaded configuration.
    ///
    /// # Errors
    /// `AuthError::MissingSigningKey` if the configured secret is empty.
    pub fn from_config(config: &AppConfig, store: Arc<dyn Store>) -> Result<Self, AuthError> {
        let keys = SigningKeys::from_secret(&config.jwt_secret)?;
        Ok(Self::new(store, keys, &config.jwt_issuer)
            .with_job_policy(config.job_creation_policy)
            .with_request_timeout(config.request_timeout))
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_job_policy(mut self, policy: JobCreationPolicy) -> Self {
        self.job_policy = policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
