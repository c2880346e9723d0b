// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Narrow persistence capabilities used by the API. Handlers and the login
//! flow only ever see these traits; the backing store is chosen at startup.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: process memory, deterministic ids, default
//! - [`RedbStore`]: embedded redb file selected by `DATABASE_PATH`
//!
//! ## Semantics shared by all backends
//!
//! - Ids are assigned by the store, start at 1 and never change
//! - User names and emails are unique
//! - A job can only be created under an existing company
//! - A company may be created together with its initial jobs

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Company, CompanyId, Job, JobId, NewCompany, NewJob, NewUser, User,
};

pub mod memory;
pub mod redb_store;
#[cfg(test)]
pub mod testing;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The request that issued the call went away before it completed.
    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Create a company along with any initial jobs it carries.
    async fn create_company(&self, company: NewCompany) -> StorageResult<Company>;

    async fn list_companies(&self) -> StorageResult<Vec<Company>>;

    async fn find_company(&self, id: CompanyId) -> StorageResult<Company>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create_job(&self, job: NewJob) -> StorageResult<Job>;

    /// Jobs posted under a company; empty when the company has none.
    async fn list_jobs_by_company(&self, company_id: CompanyId) -> StorageResult<Vec<Job>>;

    async fn list_jobs(&self) -> StorageResult<Vec<Job>>;

    async fn find_job(&self, id: JobId) -> StorageResult<Job>;
}

/// Everything the service needs from a backend.
#[async_trait]
pub trait Store: UserStore + CompanyStore + JobStore {
    /// Cheap liveness probe used by the readiness endpoint.
    async fn ping(&self) -> StorageResult<()>;

    fn backend_name(&self) -> &'static str;
}
