// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an immutable [`AppConfig`] which is then passed to the
//! components that need it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC secret used to sign bearer tokens | Required |
//! | `JWT_ISSUER` | Issuer claim written into every token | `jobportal project` |
//! | `DATABASE_PATH` | redb database file (in-memory store when unset) | unset |
//! | `REQUEST_TIMEOUT_SECS` | Per-request deadline for persistence calls (1..=86400) | `30` |
//! | `JOB_CREATION_POLICY` | `open` or `owner` | `open` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{collections::HashMap, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::auth::ownership::JobCreationPolicy;
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the token signing secret.
///
/// There is no default: the server refuses to start without it rather than
/// issuing tokens signed with a guessable key.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";
pub const JOB_CREATION_POLICY_ENV: &str = "JOB_CREATION_POLICY";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ISSUER: &str = "jobportal project";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Audience claim carried by every token this service issues.
pub const TOKEN_AUDIENCE: &str = "companies";

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{JWT_SECRET_ENV} must be set to a non-empty value")]
    MissingJwtSecret,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Immutable process configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: Vec<u8>,
    pub jwt_issuer: String,
    pub database_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub job_creation_policy: JobCreationPolicy,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("database_path", &self.database_path)
            .field("request_timeout", &self.request_timeout)
            .field("job_creation_policy", &self.job_creation_policy)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let jwt_secret = get(JWT_SECRET_ENV)
            .ok_or(ConfigError::MissingJwtSecret)?
            .as_bytes()
            .to_vec();

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: raw.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get(REQUEST_TIMEOUT_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..=MAX_REQUEST_TIMEOUT_SECS).contains(secs))
                .ok_or_else(|| ConfigError::InvalidValue {
                    name: REQUEST_TIMEOUT_ENV,
                    value: raw.to_string(),
                })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let job_creation_policy = match get(JOB_CREATION_POLICY_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: JOB_CREATION_POLICY_ENV,
                value: raw.to_string(),
            })?,
            None => JobCreationPolicy::default(),
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: LOG_FORMAT_ENV,
                value: raw.to_string(),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or(DEFAULT_HOST).to_string(),
            port,
            jwt_secret,
            jwt_issuer: get(JWT_ISSUER_ENV).unwrap_or(DEFAULT_ISSUER).to_string(),
            database_path: get(DATABASE_PATH_ENV).map(PathBuf::from),
            request_timeout: Duration::from_secs(timeout_secs),
            job_creation_policy,
            log_format,
        })
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: HOST_ENV,
                value: self.host.clone(),
            })
    }
}
