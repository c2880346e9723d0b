// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Records handed to and returned from the persistence layer, and the
//! request/response bodies of the REST API. All public types derive
//! `ToSchema` for the OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Users**: registered identities; the password hash never leaves the server
//! - **Companies**: owned by the user that created them
//! - **Jobs**: posted under a company

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type UserId = u64;
pub type CompanyId = u64;
pub type JobId = u64;

// =============================================================================
// Users
// =============================================================================

/// A registered user as held by the store.
///
/// Deliberately not `Serialize`: responses go through [`UserResponse`] so the
/// password hash cannot leak into a body by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Body of `POST /api/register`.
///
/// Fields are optional at the serde level so a missing field surfaces as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A registration request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Require name, email and password, and a syntactically valid email.
    pub fn validate(self) -> Option<Registration> {
        let name = non_blank(self.name)?;
        let email = non_blank(self.email)?;
        let password = self.password.filter(|p| !p.is_empty())?;

        if !is_valid_email(&email) {
            return None;
        }

        Some(Registration {
            name,
            email,
            password,
        })
    }
}

/// Body of `POST /api/login`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token handed out by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    /// Expiry as a Unix timestamp (seconds).
    pub expires_at: i64,
}

// =============================================================================
// Companies
// =============================================================================

/// A company and, when requested at creation, the jobs created with it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    pub company_name: String,
    pub founded_year: i32,
    pub location: String,
    pub address: String,
    /// Owning user; taken from the caller's verified identity, never the body.
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<Job>,
}

/// Body of `POST /api/companies`.
///
/// Any `user_id` sent by the client is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub jobs: Vec<CreateJobRequest>,
}

impl CreateCompanyRequest {
    /// Validate the request and bind the new company to `owner`.
    pub fn into_new_company(self, owner: UserId) -> Option<NewCompany> {
        let founded_year = self.founded_year.filter(|year| *year != 0)?;

        Some(NewCompany {
            company_name: non_blank(self.company_name)?,
            founded_year,
            location: non_blank(self.location)?,
            address: non_blank(self.address)?,
            owner,
            jobs: self.jobs,
        })
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub company_name: String,
    pub founded_year: i32,
    pub location: String,
    pub address: String,
    pub owner: UserId,
    pub jobs: Vec<CreateJobRequest>,
}

/// Response of `GET /api/view`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyListResponse {
    #[serde(rename = "companies list")]
    pub companies: Vec<Company>,
}

// =============================================================================
// Jobs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub company_id: CompanyId,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/companies/{companyID}/jobs`.
///
/// The company comes from the path; a `company_id` in the body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
}

/// Input for creating a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub company_id: CompanyId,
}

impl CreateJobRequest {
    pub fn for_company(self, company_id: CompanyId) -> NewJob {
        NewJob {
            title: self.title,
            description: self.description,
            company_id,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Syntactic email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
