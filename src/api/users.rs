// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and the authenticated status check.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::login::{self, FlowError},
    context::RequestContext,
    error::{ApiError, ErrorKey},
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    state::AppState,
};

/// Body of `GET /api/check`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub msg: String,
}

fn signup_failed() -> ApiError {
    ApiError::server_error(ErrorKey::Msg, "user signup failed")
}

fn login_failed() -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, ErrorKey::Msg, "login failed")
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Name, email or password missing or invalid"),
        (status = 500, description = "User could not be stored"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let registration = body.ok().and_then(|Json(req)| req.validate()).ok_or_else(|| {
        tracing::info!(trace_id = %ctx.trace_id(), "registration rejected: missing or invalid fields");
        ApiError::bad_request(ErrorKey::Msg, "please provide Name, Email and Password")
    })?;

    let user = login::register(state.store.as_ref(), &state.hasher, &ctx, registration)
        .await
        .map_err(|err| {
            tracing::error!(trace_id = %ctx.trace_id(), error = %err, "user signup failed");
            match err {
                FlowError::Storage(e) => ApiError::storage(&e, signup_failed()),
                FlowError::Auth(_) => signup_failed(),
            }
        })?;

    tracing::info!(trace_id = %ctx.trace_id(), user_id = user.id, "user registered");
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 401, description = "Unknown email or wrong password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Ok(Json(request)) = body else {
        tracing::warn!(trace_id = %ctx.trace_id(), "login rejected: unreadable body");
        return Err(login_failed());
    };

    let result = login::authenticate(
        state.store.as_ref(),
        &state.hasher,
        &state.issuer,
        &ctx,
        &request.email,
        request.password,
    )
    .await;

    match result {
        Ok(signed) => {
            tracing::info!(trace_id = %ctx.trace_id(), sub = %signed.claims.sub, "token issued");
            Ok(Json(TokenResponse {
                token: signed.token,
                token_type: "Bearer".to_string(),
                expires_at: signed.claims.exp,
            }))
        }
        Err(FlowError::Auth(err)) if err.is_unauthenticated() => {
            tracing::warn!(trace_id = %ctx.trace_id(), reason = %err, "login failed");
            Err(login_failed())
        }
        Err(FlowError::Auth(err)) => {
            tracing::error!(trace_id = %ctx.trace_id(), error = %err, "login failed");
            Err(ApiError::internal())
        }
        Err(FlowError::Storage(err)) => {
            tracing::error!(trace_id = %ctx.trace_id(), error = %err, "login failed");
            Err(ApiError::storage(&err, login_failed()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/check",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token accepted", body = StatusResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn check(ctx: RequestContext) -> Result<Json<StatusResponse>, ApiError> {
    ctx.claims()?;
    Ok(Json(StatusResponse {
        msg: "statusOk".to_string(),
    }))
}
