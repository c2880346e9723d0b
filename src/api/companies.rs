// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Company endpoints.
//!
//! A new company is always owned by the caller's verified subject. Reads are
//! open to every authenticated user.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use super::parse_id;
use crate::{
    context::RequestContext,
    error::{ApiError, ErrorKey},
    models::{Company, CompanyListResponse, CreateCompanyRequest},
    state::AppState,
};

fn missing_details() -> ApiError {
    ApiError::bad_request(ErrorKey::Msg, "please provide all details")
}

#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CreateCompanyRequest,
    tag = "Companies",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Company created and owned by the caller", body = Company),
        (status = 400, description = "Required company fields missing"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 500, description = "Company could not be stored"),
    )
)]
pub async fn create_company(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Result<Json<Company>, ApiError> {
    let owner = ctx.subject_id()?;

    let Ok(Json(request)) = body else {
        tracing::info!(trace_id = %ctx.trace_id(), "company rejected: unreadable body");
        return Err(missing_details());
    };
    let new_company = request.into_new_company(owner).ok_or_else(|| {
        tracing::info!(trace_id = %ctx.trace_id(), "company rejected: missing fields");
        missing_details()
    })?;

    let company = ctx
        .guard(state.store.create_company(new_company))
        .await
        .map_err(|err| {
            tracing::error!(trace_id = %ctx.trace_id(), error = %err, "company creation failed");
            ApiError::storage(
                &err,
                ApiError::server_error(ErrorKey::Msg, "Company creation failed"),
            )
        })?;

    tracing::info!(
        trace_id = %ctx.trace_id(),
        company_id = company.id,
        owner,
        "company created"
    );
    Ok(Json(company))
}

#[utoipa::path(
    get,
    path = "/api/view",
    tag = "Companies",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All companies", body = CompanyListResponse),
        (status = 400, description = "Companies could not be read"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<CompanyListResponse>, ApiError> {
    ctx.claims()?;

    let companies = ctx
        .guard(state.store.list_companies())
        .await
        .map_err(|err| {
            tracing::error!(trace_id = %ctx.trace_id(), error = %err, "listing companies failed");
            ApiError::storage(
                &err,
                ApiError::bad_request(ErrorKey::Msg, "problem in viewing company"),
            )
        })?;

    Ok(Json(CompanyListResponse { companies }))
}

#[utoipa::path(
    get,
    path = "/api/companies/{companyID}",
    params(("companyID" = u64, Path, description = "Company identifier")),
    tag = "Companies",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The company", body = Company),
        (status = 400, description = "Invalid or unknown company id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    ctx: RequestContext,
    company_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Company>, ApiError> {
    ctx.claims()?;

    let company_id = parse_id(company_id).ok_or_else(|| {
        tracing::info!(trace_id = %ctx.trace_id(), "invalid company id in path");
        ApiError::bad_request(ErrorKey::Error, "Invalid company ID")
    })?;

    let company = ctx
        .guard(state.store.find_company(company_id))
        .await
        .map_err(|err| {
            tracing::error!(trace_id = %ctx.trace_id(), company_id, error = %err, "fetching company failed");
            ApiError::storage(
                &err,
                ApiError::bad_request(ErrorKey::Msg, "problem in fetching company details"),
            )
        })?;

    Ok(Json(company))
}
