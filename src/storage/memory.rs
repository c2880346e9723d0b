// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store.
//!
//! Used when no `DATABASE_PATH` is configured and by the test suite. Ids are
//! handed out from per-table counters so results are deterministic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CompanyStore, JobStore, StorageError, StorageResult, Store, UserStore};
use crate::models::{
    Company, CompanyId, Job, JobId, NewCompany, NewJob, NewUser, User, UserId,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    companies: BTreeMap<CompanyId, Company>,
    jobs: BTreeMap<JobId, Job>,
    last_user_id: UserId,
    last_company_id: CompanyId,
    last_job_id: JobId,
}

impl Tables {
    fn insert_job(&mut self, job: NewJob) -> Job {
        self.last_job_id += 1;
        let job = Job {
            id: self.last_job_id,
            title: job.title,
            description: job.description,
            company_id: job.company_id,
            created_at: Utc::now(),
        };
        self.jobs.insert(job.id, job.clone());
        job
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .users
            .values()
            .find(|u| u.email == user.email || u.name == user.name)
        {
            let field = if existing.email == user.email { "email" } else { "name" };
            return Err(StorageError::AlreadyExists(format!("user with this {field}")));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StorageError::NotFound("user".to_string()))
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn create_company(&self, company: NewCompany) -> StorageResult<Company> {
        let mut tables = self.tables.write().await;

        tables.last_company_id += 1;
        let mut created = Company {
            id: tables.last_company_id,
            company_name: company.company_name,
            founded_year: company.founded_year,
            location: company.location,
            address: company.address,
            user_id: company.owner,
            created_at: Utc::now(),
            jobs: Vec::new(),
        };
        tables.companies.insert(created.id, created.clone());

        let company_id = created.id;
        created.jobs = company
            .jobs
            .into_iter()
            .map(|job| tables.insert_job(job.for_company(company_id)))
            .collect();

        Ok(created)
    }

    async fn list_companies(&self) -> StorageResult<Vec<Company>> {
        Ok(self.tables.read().await.companies.values().cloned().collect())
    }

    async fn find_company(&self, id: CompanyId) -> StorageResult<Company> {
        self.tables
            .read()
            .await
            .companies
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("company {id}")))
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, job: NewJob) -> StorageResult<Job> {
        let mut tables = self.tables.write().await;

        if !tables.companies.contains_key(&job.company_id) {
            return Err(StorageError::NotFound(format!("company {}", job.company_id)));
        }

        Ok(tables.insert_job(job))
    }

    async fn list_jobs_by_company(&self, company_id: CompanyId) -> StorageResult<Vec<Job>> {
        Ok(self
            .tables
            .read()
            .await
            .jobs
            .values()
            .filter(|job| job.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        Ok(self.tables.read().await.jobs.values().cloned().collect())
    }

    async fn find_job(&self, id: JobId) -> StorageResult<Job> {
        self.tables
            .read()
            .await
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("job {id}")))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::conformance;

    #[tokio::test]
    async fn users_behave() {
        conformance::users(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn companies_and_jobs_behave() {
        conformance::companies_and_jobs(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn concurrent_registrations_get_distinct_ids() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_user(NewUser {
                            name: format!("user{i}"),
                            email: format!("user{i}@email.com"),
                            password_hash: "hash".to_string(),
                        })
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }
}
