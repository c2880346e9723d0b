// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization decision points.
//!
//! The verified subject is the only caller identity handlers trust; ids in
//! paths and bodies are data. Reads are not ownership-filtered: any
//! authenticated user may view any company or job. Job creation is governed
//! by [`JobCreationPolicy`].

use std::str::FromStr;

use thiserror::Error;

use super::AuthError;
use crate::models::{Company, UserId};

/// Resources recording the user that created them.
pub trait OwnedResource {
    fn owner_id(&self) -> UserId;
}

impl OwnedResource for Company {
    fn owner_id(&self) -> UserId {
        self.user_id
    }
}

pub trait OwnershipEnforcer {
    /// # Errors
    /// Returns `AuthError::AuthorizationDenied` if `subject` is not the owner.
    fn verify_ownership(&self, subject: UserId, action: &'static str) -> Result<(), AuthError>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, subject: UserId, action: &'static str) -> Result<(), AuthError> {
        if self.owner_id() == subject {
            Ok(())
        } else {
            Err(AuthError::AuthorizationDenied {
                user_id: subject,
                action,
            })
        }
    }
}

/// Who may post a job under a company (`JOB_CREATION_POLICY`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobCreationPolicy {
    /// Any authenticated user may post under any company.
    #[default]
    Open,
    /// Only the company's owner may post under it.
    OwnerOnly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown job creation policy {0:?} (expected `open` or `owner`)")]
pub struct UnknownPolicy(pub String);

impl FromStr for JobCreationPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(JobCreationPolicy::Open),
            "owner" | "owner_only" => Ok(JobCreationPolicy::OwnerOnly),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl JobCreationPolicy {
    /// Whether the target company has to be loaded to decide.
    pub fn requires_ownership(self) -> bool {
        matches!(self, JobCreationPolicy::OwnerOnly)
    }

    pub fn authorize(self, subject: UserId, company: &Company) -> Result<(), AuthError> {
        match self {
            JobCreationPolicy::Open => Ok(()),
            JobCreationPolicy::OwnerOnly => company.verify_ownership(subject, "post jobs"),
        }
    }
}
