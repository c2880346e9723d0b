// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the protected router subtree, after the request tracer:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/jobs", get(list_jobs))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.verifier.clone(),
//!         require_auth,
//!     ));
//! ```
//!
//! On any failure the middleware writes the 401 itself and never calls the
//! next stage, so handlers cannot run without a verified identity.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{verifier::ClaimsVerifier, AuthError};
use crate::context::{ContextError, RequestContext};
use crate::error::ApiError;

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;

    let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Verify the bearer token and attach the claims to the request context.
pub async fn require_auth(
    State(verifier): State<ClaimsVerifier>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(ctx) = request.extensions_mut().remove::<RequestContext>() else {
        tracing::error!(error = %ContextError::MissingTraceId, "auth ran before the request tracer");
        return ApiError::internal().into_response();
    };

    let verified = bearer_token(request.headers()).and_then(|token| verifier.verify(token));

    match verified {
        Ok(claims) => {
            tracing::debug!(trace_id = %ctx.trace_id(), sub = %claims.sub, "request authenticated");
            request.extensions_mut().insert(ctx.with_claims(claims));
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(trace_id = %ctx.trace_id(), reason = %err, "rejected unauthenticated request");
            err.into_response()
        }
    }
}
