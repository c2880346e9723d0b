// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user id → JSON user record
//! - `user_emails` / `user_names`: unique email / name → user id
//! - `companies`: company id → JSON company (without jobs)
//! - `jobs`: job id → JSON job
//! - `sequences`: table name → last assigned id
//!
//! redb is synchronous, so every operation runs on the blocking pool.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{CompanyStore, JobStore, StorageError, StorageResult, Store, UserStore};
use crate::models::{
    Company, CompanyId, Job, JobId, NewCompany, NewJob, NewUser, User, UserId,
};

// =============================================================================
// Table Definitions
// =============================================================================

const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");
const USER_EMAILS: TableDefinition<&str, u64> = TableDefinition::new("user_emails");
const USER_NAMES: TableDefinition<&str, u64> = TableDefinition::new("user_names");
const COMPANIES: TableDefinition<u64, &[u8]> = TableDefinition::new("companies");
const JOBS: TableDefinition<u64, &[u8]> = TableDefinition::new("jobs");
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
enum DbError {
    #[error("cannot create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(StorageError),
}

impl From<DbError> for StorageError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(inner) => inner,
            other => StorageError::Backend(other.to_string()),
        }
    }
}

type DbResult<T> = Result<T, DbError>;

/// On-disk user record; unlike [`User`] it carries the hash through serde.
#[derive(Serialize, Deserialize)]
struct UserRecord {
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            created_at: r.created_at,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn next_id(txn: &WriteTransaction, sequence: &str) -> DbResult<u64> {
    let mut table = txn.open_table(SEQUENCES)?;
    let next = table.get(sequence)?.map(|v| v.value()).unwrap_or(0) + 1;
    table.insert(sequence, next)?;
    Ok(next)
}

fn insert_job(txn: &WriteTransaction, job: NewJob) -> DbResult<Job> {
    let id = next_id(txn, "jobs")?;
    let job = Job {
        id,
        title: job.title,
        description: job.description,
        company_id: job.company_id,
        created_at: Utc::now(),
    };
    let json = serde_json::to_vec(&job)?;
    txn.open_table(JOBS)?.insert(id, json.as_slice())?;
    Ok(job)
}

fn read_all<T: DeserializeOwned>(
    db: &Database,
    definition: TableDefinition<'static, u64, &'static [u8]>,
) -> DbResult<Vec<T>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(definition)?;

    let mut out = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        out.push(serde_json::from_slice(value.value())?);
    }
    Ok(out)
}

fn read_one<T: DeserializeOwned>(
    db: &Database,
    definition: TableDefinition<'static, u64, &'static [u8]>,
    id: u64,
    what: &str,
) -> DbResult<T> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(definition)?;
    let found = table.get(id)?;
    let Some(value) = found else {
        return Err(DbError::Domain(StorageError::NotFound(format!("{what} {id}"))));
    };
    let record = serde_json::from_slice(value.value())?;
    Ok(record)
}

// =============================================================================
// RedbStore
// =============================================================================

pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_inner(path).map_err(StorageError::from)
    }

    fn open_inner(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(USER_NAMES)?;
            let _ = write_txn.open_table(COMPANIES)?;
            let _ = write_txn.open_table(JOBS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn run<T, F>(&self, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> DbResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Backend(format!("storage task failed: {e}")))?
            .map_err(StorageError::from)
    }
}

#[async_trait]
impl UserStore for RedbStore {
    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let record = {
                let mut emails = write_txn.open_table(USER_EMAILS)?;
                let mut names = write_txn.open_table(USER_NAMES)?;
                if emails.get(user.email.as_str())?.is_some() {
                    return Err(DbError::Domain(StorageError::AlreadyExists(
                        "user with this email".to_string(),
                    )));
                }
                if names.get(user.name.as_str())?.is_some() {
                    return Err(DbError::Domain(StorageError::AlreadyExists(
                        "user with this name".to_string(),
                    )));
                }

                let id = next_id(&write_txn, "users")?;
                let record = UserRecord {
                    id,
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                };
                let json = serde_json::to_vec(&record)?;
                write_txn.open_table(USERS)?.insert(id, json.as_slice())?;
                emails.insert(record.email.as_str(), id)?;
                names.insert(record.name.as_str(), id)?;
                record
            };
            write_txn.commit()?;
            Ok(User::from(record))
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User> {
        let email = email.to_string();
        self.run(move |db| {
            let read_txn = db.begin_read()?;
            let id = read_txn
                .open_table(USER_EMAILS)?
                .get(email.as_str())?
                .map(|v| v.value())
                .ok_or_else(|| DbError::Domain(StorageError::NotFound("user".to_string())))?;
            let record: UserRecord = read_one(db, USERS, id, "user")?;
            Ok(User::from(record))
        })
        .await
    }
}

#[async_trait]
impl CompanyStore for RedbStore {
    async fn create_company(&self, company: NewCompany) -> StorageResult<Company> {
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let id = next_id(&write_txn, "companies")?;
            let mut created = Company {
                id,
                company_name: company.company_name,
                founded_year: company.founded_year,
                location: company.location,
                address: company.address,
                user_id: company.owner,
                created_at: Utc::now(),
                jobs: Vec::new(),
            };
            let json = serde_json::to_vec(&created)?;
            write_txn.open_table(COMPANIES)?.insert(id, json.as_slice())?;

            for job in company.jobs {
                let job = insert_job(&write_txn, job.for_company(id))?;
                created.jobs.push(job);
            }
            write_txn.commit()?;
            Ok(created)
        })
        .await
    }

    async fn list_companies(&self) -> StorageResult<Vec<Company>> {
        self.run(|db| read_all(db, COMPANIES)).await
    }

    async fn find_company(&self, id: CompanyId) -> StorageResult<Company> {
        self.run(move |db| read_one(db, COMPANIES, id, "company")).await
    }
}

#[async_trait]
impl JobStore for RedbStore {
    async fn create_job(&self, job: NewJob) -> StorageResult<Job> {
        self.run(move |db| {
            let write_txn = db.begin_write()?;
            let exists = write_txn
                .open_table(COMPANIES)?
                .get(job.company_id)?
                .is_some();
            if !exists {
                return Err(DbError::Domain(StorageError::NotFound(format!(
                    "company {}",
                    job.company_id
                ))));
            }
            let job = insert_job(&write_txn, job)?;
            write_txn.commit()?;
            Ok(job)
        })
        .await
    }

    async fn list_jobs_by_company(&self, company_id: CompanyId) -> StorageResult<Vec<Job>> {
        self.run(move |db| {
            let jobs: Vec<Job> = read_all(db, JOBS)?;
            Ok(jobs
                .into_iter()
                .filter(|job| job.company_id == company_id)
                .collect())
        })
        .await
    }

    async fn list_jobs(&self) -> StorageResult<Vec<Job>> {
        self.run(|db| read_all(db, JOBS)).await
    }

    async fn find_job(&self, id: JobId) -> StorageResult<Job> {
        self.run(move |db| read_one(db, JOBS, id, "job")).await
    }
}

#[async_trait]
impl Store for RedbStore {
    async fn ping(&self) -> StorageResult<()> {
        self.run(|db| {
            let read_txn = db.begin_read()?;
            let _ = read_txn.open_table(SEQUENCES)?;
            Ok(())
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "redb"
    }
}
