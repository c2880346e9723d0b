// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Context
//!
//! Every inbound request gets a [`RequestContext`] from [`trace_requests`]
//! before any other middleware runs. It carries:
//!
//! - a fresh [`TraceId`] used only for server-side log correlation
//! - the verified [`Claims`], once the auth middleware accepted the request
//! - a cancellation token tripped when the request future is dropped
//! - the request deadline
//!
//! Accessors return [`ContextError`] instead of defaulting. A missing value
//! after middleware means the router is wired wrong, so it surfaces as a 500.

use std::{fmt, future::Future, time::Duration};

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::ApiError;
use crate::models::UserId;
use crate::storage::{StorageError, StorageResult};

/// Per-request correlation id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("request context (trace id) missing")]
    MissingTraceId,

    #[error("verified claims missing from request context")]
    MissingClaims,

    #[error("claims subject {0:?} is not a user id")]
    InvalidSubject(String),
}

impl From<ContextError> for ApiError {
    fn from(_: ContextError) -> Self {
        ApiError::internal()
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: TraceId,
    claims: Option<Claims>,
    cancel: CancellationToken,
    deadline: Instant,
}

impl RequestContext {
    /// Context for a request that must finish within `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            trace_id: TraceId::new(),
            claims: None,
            cancel: CancellationToken::new(),
            deadline: deadline_after(timeout),
        }
    }

    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn claims(&self) -> Result<&Claims, ContextError> {
        self.claims.as_ref().ok_or_else(|| {
            tracing::error!(trace_id = %self.trace_id, "verified claims missing from request context");
            ContextError::MissingClaims
        })
    }

    /// The caller's user id, taken from the verified subject.
    pub fn subject_id(&self) -> Result<UserId, ContextError> {
        let claims = self.claims()?;
        claims.user_id().ok_or_else(|| {
            tracing::error!(trace_id = %self.trace_id, "claims subject is not a user id");
            ContextError::InvalidSubject(claims.sub.clone())
        })
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Run a persistence call unless the request is gone or out of time.
    ///
    /// The call is not started once the request was cancelled or its deadline
    /// passed, and its result is discarded if either happens while it runs.
    pub async fn guard<T, F>(&self, call: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(StorageError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(StorageError::DeadlineExceeded);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StorageError::Cancelled),
            _ = tokio::time::sleep_until(self.deadline) => Err(StorageError::DeadlineExceeded),
            result = call => result,
        }
    }
}

/// Request tracer middleware.
///
/// Assigns a new trace id (client-supplied ids are ignored), opens the
/// `request` span and cancels the context when the request future is dropped.
pub async fn trace_requests(
    State(timeout): State<Duration>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::new(timeout);
    let span = tracing::info_span!(
        "request",
        trace_id = %ctx.trace_id(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    let _cancel_on_drop = ctx.cancellation().clone().drop_guard();
    request.extensions_mut().insert(ctx);

    next.run(request).instrument(span).await
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestContext>().cloned().ok_or_else(|| {
            tracing::error!(error = %ContextError::MissingTraceId, "request tracer did not run");
            ApiError::internal()
        })
    }
}

/// `now + timeout`, saturating at a point roughly thirty years ahead.
fn deadline_after(timeout: Duration) -> Instant {
    const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);
    let now = Instant::now();
    now.checked_add(timeout.min(FAR_FUTURE)).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn claims(sub: &str) -> Claims {
        Claims {
            iss: "jobportal project".into(),
            sub: sub.into(),
            aud: vec!["companies".into()],
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[test]
    fn accessors_fail_loudly() {
        let ctx = RequestContext::new(Duration::from_secs(30));
        assert_eq!(ctx.claims(), Err(ContextError::MissingClaims));
        assert_eq!(ctx.subject_id(), Err(ContextError::MissingClaims));

        let ctx = ctx.with_claims(claims("abc"));
        assert_eq!(
            ctx.subject_id(),
            Err(ContextError::InvalidSubject("abc".into()))
        );
    }

    #[test]
    fn subject_comes_from_claims() {
        let ctx = RequestContext::new(Duration::from_secs(30)).with_claims(claims("1"));
        assert_eq!(ctx.subject_id(), Ok(1));
    }

    #[test]
    fn trace_ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| TraceId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[tokio::test]
    async fn guard_passes_result_through() {
        let ctx = RequestContext::new(Duration::from_secs(30));
        assert_eq!(ctx.guard(async { Ok(5) }).await.unwrap(), 5);
        assert!(matches!(
            ctx.guard(async { Err::<(), _>(StorageError::NotFound("job 1".into())) })
                .await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn guard_skips_call_after_cancellation() {
        let ctx = RequestContext::new(Duration::from_secs(30));
        ctx.cancellation().cancel();

        let mut ran = false;
        let result = ctx
            .guard(async {
                ran = true;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(StorageError::Cancelled)));
        assert!(!ran);
    }

    #[tokio::test(start_paused = true)]
    async fn guard_abandons_call_past_deadline() {
        let ctx = RequestContext::new(Duration::from_secs(1));
        let result = ctx
            .guard(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(StorageError::DeadlineExceeded)));

        let result = ctx.guard(async { Ok(()) }).await;
        assert!(matches!(result, Err(StorageError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn oversized_timeout_saturates() {
        let ctx = RequestContext::new(Duration::MAX);
        assert!(ctx.deadline() > Instant::now() + Duration::from_secs(86_400));
        assert_eq!(ctx.guard(async { Ok(1) }).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cancellation_mid_call_discards_result() {
        let ctx = RequestContext::new(Duration::from_secs(30));
        let token = ctx.cancellation().clone();

        let call = ctx.guard(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        });
        tokio::spawn(async move { token.cancel() });

        assert!(matches!(call.await, Err(StorageError::Cancelled)));
    }
}
