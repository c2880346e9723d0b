// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login flows.
//!
//! Both depend only on [`UserStore`], the hasher and the issuer so they can be
//! exercised against the in-memory store.

use chrono::Utc;
use thiserror::Error;

use super::{
    issuer::{ClaimsIssuer, SignedToken},
    password::PasswordHasher,
    AuthError,
};
use crate::context::RequestContext;
use crate::models::{NewUser, Registration, User};
use crate::storage::{StorageError, UserStore};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Hash the password and create the user.
pub async fn register<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    ctx: &RequestContext,
    registration: Registration,
) -> Result<User, FlowError> {
    let password_hash = hasher.hash_blocking(registration.password).await?;

    let user = ctx
        .guard(store.create_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
        }))
        .await?;

    Ok(user)
}

/// Check an email/password pair and mint a token for the user.
///
/// An unknown email and a wrong password both yield
/// `AuthError::CredentialsInvalid`, and both pay for one Argon2 verification.
pub async fn authenticate<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    issuer: &ClaimsIssuer,
    ctx: &RequestContext,
    email: &str,
    password: String,
) -> Result<SignedToken, FlowError> {
    let user = match ctx.guard(store.find_user_by_email(email)).await {
        Ok(user) => user,
        Err(StorageError::NotFound(_)) => {
            hasher.verify_dummy_blocking(password).await?;
            return Err(AuthError::CredentialsInvalid.into());
        }
        Err(e) => return Err(e.into()),
    };

    if !hasher.verify_blocking(user.password_hash, password).await? {
        return Err(AuthError::CredentialsInvalid.into());
    }

    Ok(issuer.issue(user.id, Utc::now())?)
}
