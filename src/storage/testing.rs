// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test double that counts every call reaching the persistence layer.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{
    CompanyStore, JobStore, MemoryStore, StorageResult, Store, UserStore,
};
use crate::models::{Company, CompanyId, Job, JobId, NewCompany, NewJob, NewUser, User};

/// [`MemoryStore`] wrapper recording how many operations were invoked.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    creates: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of persistence calls, reads and writes alike.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of create operations.
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    fn record(&self, create: bool) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if create {
            self.creates.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        self.record(true);
        self.inner.create_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User> {
        self.record(false);
        self.inner.find_user_by_email(email).await
    }
}

#[async_trait]
impl CompanyStore for CountingStore {
    async fn create_company(&self, company: NewCompany) -> StorageResult<Company> {
        self.record(true);
        self.inner.create_company(company).await
    }

    async fn list_companies(&self) -> StorageResult<Vec<Company>> {
        self.record(false);
        self.inner.list_companies().await
    }

    async fn find_company(&self, id: CompanyId) -> StorageResult<Company> {
        self.record(false);
        self.inner.find_company(id).await
    }
}

#[async_trait]
impl JobStore for CountingStore {
    async fn create_job(&self, job: NewJob) -> StorageResult<Job> {
        self.record(true);
        self.inner.create_job(job).await
    }

    async fn list_jobs_by_company(&self, company_id: CompanyId) -> StorageResult<Vec<Job>> {
        self.record(false);
        self.inner.list_jobs_by_company(company_id).await
    }

    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        self.record(false);
        self.inner.list_jobs().await
    }

    async fn find_job(&self, id: JobId) -> StorageResult<Job> {
        self.record(false);
        self.inner.find_job(id).await
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn ping(&self) -> StorageResult<()> {
        self.inner.ping().await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}
