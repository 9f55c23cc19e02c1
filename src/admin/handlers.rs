use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::{
    admin::{
        access::AdminAccess,
        dtos::{AdaptResponse, IngestAndAdaptResponse, IngestQuery, IngestResponse},
    },
    app_state::AppState,
    error::{ErrorResponse, error_response},
};

/// Run ingestion over the configured feeds
#[utoipa::path(
    post,
    path = "/api/admin/ingest",
    tag = "admin",
    params(IngestQuery),
    responses(
        (status = 200, description = "Ingestion finished", body = IngestResponse),
        (status = 400, description = "Unknown domain", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn ingest(
    _access: AdminAccess,
    State(state): State<AppState>,
    Query(query): Query<IngestQuery>,
) -> Response {
    let domain = match query.domain() {
        Ok(domain) => domain,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error),
    };

    let sources = state.sources.select(domain);
    info!(sources = sources.len(), domain = ?domain, "admin ingest requested");

    match state.pipeline.ingest(&sources).await {
        Ok(report) => Json(IngestResponse::from(report)).into_response(),
        Err(e) => {
            error!(error = %e, "ingest failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Adapt every stored item that has no adapted summary yet
#[utoipa::path(
    post,
    path = "/api/admin/adapt-pending",
    tag = "admin",
    responses(
        (status = 200, description = "Adaptation finished", body = AdaptResponse),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn adapt_pending(_access: AdminAccess, State(state): State<AppState>) -> Response {
    match state.pipeline.adapt_pending().await {
        Ok(adapted) => Json(AdaptResponse::new(adapted)).into_response(),
        Err(e) => {
            error!(error = %e, "adaptation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Ingest all feeds, then adapt pending items
#[utoipa::path(
    post,
    path = "/api/admin/ingest-and-adapt",
    tag = "admin",
    responses(
        (status = 200, description = "Run summary", body = IngestAndAdaptResponse),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn ingest_and_adapt(_access: AdminAccess, State(state): State<AppState>) -> Response {
    match state.pipeline.ingest_and_adapt(state.sources.sources()).await {
        Ok(summary) => {
            info!(message = %summary.message, "ingest-and-adapt finished");
            Json(IngestAndAdaptResponse::from(summary)).into_response()
        }
        Err(e) => {
            error!(error = %e, "ingest-and-adapt failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
