// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::storage::StorageError;

/// JSON key an error message is rendered under.
///
/// Routes historically disagree on whether failures are reported as
/// `{"error": ...}` or `{"msg": ...}`; clients depend on both shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKey {
    Error,
    Msg,
}

impl ErrorKey {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKey::Error => "error",
            ErrorKey::Msg => "msg",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub key: ErrorKey,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, key: ErrorKey, message: impl Into<String>) -> Self {
        Self {
            status,
            key,
            message: message.into(),
        }
    }

    pub fn bad_request(key: ErrorKey, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, key, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorKey::Error, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorKey::Error, "Forbidden")
    }

    /// Generic 500 that reveals nothing about the cause.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKey::Msg,
            "Internal Server Error",
        )
    }

    pub fn server_error(key: ErrorKey, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, key, message)
    }

    /// Map a failed persistence call to the route's own error, unless the
    /// request was cancelled or ran out of time.
    pub fn storage(err: &StorageError, route_error: ApiError) -> Self {
        match err {
            StorageError::Cancelled => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorKey::Error,
                "Request cancelled",
            ),
            StorageError::DeadlineExceeded => {
                Self::new(StatusCode::REQUEST_TIMEOUT, ErrorKey::Error, "Request timed out")
            }
            _ => route_error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert(self.key.as_str().to_string(), Value::String(self.message));
        (self.status, Json(Value::Object(body))).into_response()
    }
}
