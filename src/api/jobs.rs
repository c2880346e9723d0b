// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Job endpoints.
//!
//! The owning company of a new job comes from the path, never the body.
//! Whether the caller must own that company is decided by the configured
//! [`JobCreationPolicy`](crate::auth::JobCreationPolicy).

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use super::parse_id;
use crate::{
    context::RequestContext,
    error::{ApiError, ErrorKey},
    models::{CreateJobRequest, Job},
    state::AppState,
};

fn invalid_company_id() -> ApiError {
    ApiError::bad_request(ErrorKey::Error, "Invalid company ID")
}

fn create_failed() -> ApiError {
    ApiError::server_error(ErrorKey::Error, "Failed to create job")
}

fn fetch_jobs_failed() -> ApiError {
    ApiError::server_error(ErrorKey::Error, "Failed to fetch jobs")
}

#[utoipa::path(
    post,
    path = "/api/companies/{companyID}/jobs",
    params(("companyID" = u64, Path, description = "Company the job is posted under")),
    request_body = CreateJobRequest,
    tag = "Jobs",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid body or company id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller does not own the company (owner policy only)"),
        (status = 500, description = "Job could not be stored"),
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    ctx: RequestContext,
    company_id: Result<Path<String>, PathRejection>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let subject = ctx.subject_id()?;

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::info!(trace_id = %ctx.trace_id(), reason = %rejection, "failed to parse request body");
            return Err(ApiError::bad_request(ErrorKey::Error, "Invalid request body"));
        }
    };

    let company_id = parse_id(company_id).ok_or_else(|| {
        tracing::info!(trace_id = %ctx.trace_id(), "invalid company id in path");
        invalid_company_id()
    })?;

    if state.job_policy.requires_ownership() {
        let company = ctx
            .guard(state.store.find_company(company_id))
            .await
            .map_err(|err| {
                tracing::error!(trace_id = %ctx.trace_id(), company_id, error = %err, "job creation failed");
                ApiError::storage(&err, create_failed())
            })?;

        state.job_policy.authorize(subject, &company).map_err(|err| {
            tracing::warn!(trace_id = %ctx.trace_id(), reason = %err, "job creation denied");
            ApiError::from(err)
        })?;
    }

    let job = ctx
        .guard(state.store.create_job(request.for_company(company_id)))
        .await
        .map_err(|err| {
            tracing::error!(trace_id = %ctx.trace_id(), company_id, error = %err, "job creation failed");
            ApiError::storage(&err, create_failed())
        })?;

    tracing::info!(trace_id = %ctx.trace_id(), job_id = job.id, company_id, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/companies/{companyID}/list-jobs",
    params(("companyID" = u64, Path, description = "Company identifier")),
    tag = "Jobs",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Jobs posted under the company", body = [Job]),
        (status = 400, description = "Invalid company id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 500, description = "Jobs could not be read"),
    )
)]
pub async fn list_company_jobs(
    State(state): State<AppState>,
    ctx: RequestContext,
    company_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Job>>, ApiError> {
    ctx.claims()?;

    let company_id = parse_id(company_id).ok_or_else(|| {
        tracing::info!(trace_id = %ctx.trace_id(), "invalid company id in path");
        invalid_company_id()
    })?;

    let jobs = ctx
        .guard(state.store.list_jobs_by_company(company_id))
        .await
        .map_err(|err| {
            tracing::error!(trace_id = %ctx.trace_id(), company_id, error = %err, "listing jobs failed");
            ApiError::storage(&err, fetch_jobs_failed())
        })?;

    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Every posted job", body = [Job]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 500, description = "Jobs could not be read"),
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Job>>, ApiError> {
    ctx.claims()?;

    let jobs = ctx.guard(state.store.list_jobs()).await.map_err(|err| {
        tracing::error!(trace_id = %ctx.trace_id(), error = %err, "listing jobs failed");
        ApiError::storage(&err, fetch_jobs_failed())
    })?;

    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{jobID}",
    params(("jobID" = u64, Path, description = "Job identifier")),
    tag = "Jobs",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The job", body = Job),
        (status = 400, description = "Invalid job id"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 500, description = "Job could not be read"),
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    ctx: RequestContext,
    job_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Job>, ApiError> {
    ctx.claims()?;

    let job_id = parse_id(job_id).ok_or_else(|| {
        tracing::info!(trace_id = %ctx.trace_id(), "invalid job id in path");
        ApiError::bad_request(ErrorKey::Error, "Invalid job ID")
    })?;

    let job = ctx.guard(state.store.find_job(job_id)).await.map_err(|err| {
        tracing::error!(trace_id = %ctx.trace_id(), job_id, error = %err, "fetching job failed");
        ApiError::storage(
            &err,
            ApiError::server_error(ErrorKey::Error, "Failed to fetch job"),
        )
    })?;

    Ok(Json(job))
}
