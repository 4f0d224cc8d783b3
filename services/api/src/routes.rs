use crate::infra::{AppState, InMemoryAlertPublisher};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use fleet_quality::error::AppError;
use fleet_quality::quality::{quality_router, write_series_csv, QualityService, SeriesRequest};
use serde_json::json;
use std::sync::Arc;

type SharedService = Arc<QualityService<InMemoryAlertPublisher>>;

pub(crate) fn with_quality_routes(service: SharedService) -> axum::Router {
    quality_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/quality/export",
            axum::routing::post(export_endpoint),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Samples a series and returns it as CSV rather than JSON.
pub(crate) async fn export_endpoint(
    Extension(service): Extension<SharedService>,
    Json(request): Json<SeriesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let series = service.series(&request)?;
    let mut buffer = Vec::new();
    write_series_csv(&series, &mut buffer)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        buffer,
    ))
}
