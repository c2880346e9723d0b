// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Job Portal - multi-tenant job posting service
//!
//! Users register, log in for a bearer token, create companies they own and
//! post jobs under them.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and the OpenAPI document
//! - `auth` - Password hashing, token issuance/verification, authorization
//! - `context` - Per-request trace id, claims, cancellation and deadline
//! - `storage` - Persistence traits with in-memory and redb backends

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
