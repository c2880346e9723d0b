// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::PathRejection, Path},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::require_auth,
    context::trace_requests,
    models::{
        Company, CompanyListResponse, CreateCompanyRequest, CreateJobRequest, Job, LoginRequest,
        RegisterRequest, TokenResponse, UserResponse,
    },
    state::AppState,
};

pub mod companies;
pub mod health;
pub mod jobs;
pub mod users;

/// Build the application router.
///
/// Layer order, outermost first: CORS, request tracer, HTTP trace logging,
/// then (protected routes only) the auth middleware.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/register", post(users::register))
        .route("/api/login", post(users::login))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let protected = Router::new()
        .route("/api/check", get(users::check))
        .route("/api/companies", post(companies::create_company))
        .route("/api/view", get(companies::list_companies))
        .route("/api/companies/{companyID}", get(companies::get_company))
        .route("/api/companies/{companyID}/jobs", post(jobs::create_job))
        .route(
            "/api/companies/{companyID}/list-jobs",
            get(jobs::list_company_jobs),
        )
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/{jobID}", get(jobs::get_job))
        .route_layer(from_fn_with_state(state.verifier.clone(), require_auth));

    let request_timeout = state.request_timeout;

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn_with_state(request_timeout, trace_requests))
}

/// Parse a path id as a plain decimal `u64`.
///
/// Signs, whitespace, empty strings and values above `u64::MAX` are rejected.
pub(crate) fn parse_id(raw: Result<Path<String>, PathRejection>) -> Option<u64> {
    let Path(raw) = raw.ok()?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::login,
        users::check,
        companies::create_company,
        companies::list_companies,
        companies::get_company,
        jobs::create_job,
        jobs::list_company_jobs,
        jobs::list_jobs,
        jobs::get_job,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            UserResponse,
            LoginRequest,
            TokenResponse,
            users::StatusResponse,
            Company,
            CreateCompanyRequest,
            CompanyListResponse,
            Job,
            CreateJobRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration and login"),
        (name = "Companies", description = "Companies owned by their creator"),
        (name = "Jobs", description = "Jobs posted under companies"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
