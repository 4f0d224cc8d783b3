use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::catalog::KpiCatalog;
use super::engine::AssessmentRequest;
use super::service::{AlertPublisher, QualityService, QualityServiceError, SeriesRequest};

type SharedService<P, C> = Arc<QualityService<P, C>>;

/// Router builder exposing the quality dashboard endpoints.
pub fn quality_router<P, C>(service: SharedService<P, C>) -> Router
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    Router::new()
        .route("/api/v1/quality/profiles", get(profiles_handler::<P, C>))
        .route("/api/v1/quality/fleet", get(fleet_handler::<P, C>))
        .route("/api/v1/quality/assess", post(assess_handler::<P, C>))
        .route("/api/v1/quality/series", post(series_handler::<P, C>))
        .route("/api/v1/quality/history", get(history_handler::<P, C>))
        .route(
            "/api/v1/quality/alerts",
            get(alerts_handler::<P, C>).delete(clear_alerts_handler::<P, C>),
        )
        .route(
            "/api/v1/quality/alerts/:alert_id",
            delete(dismiss_alert_handler::<P, C>),
        )
        .with_state(service)
}

fn ok_json<T: serde::Serialize>(value: T) -> Response {
    (StatusCode::OK, axum::Json(value)).into_response()
}

fn error_response(error: QualityServiceError) -> Response {
    let status = match &error {
        QualityServiceError::AlertNotFound(_) => StatusCode::NOT_FOUND,
        QualityServiceError::WindowTooLarge { .. } => StatusCode::BAD_REQUEST,
        QualityServiceError::Publish(_) => StatusCode::BAD_GATEWAY,
        QualityServiceError::EngineUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn profiles_handler<P, C>(State(service): State<SharedService<P, C>>) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.profiles() {
        Ok(views) => ok_json(views),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fleet_handler<P, C>(State(service): State<SharedService<P, C>>) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.fleet() {
        Ok(metrics) => ok_json(metrics),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assess_handler<P, C>(
    State(service): State<SharedService<P, C>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.assess(&request, Utc::now()) {
        Ok(assessment) => ok_json(assessment),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn series_handler<P, C>(
    State(service): State<SharedService<P, C>>,
    axum::Json(request): axum::Json<SeriesRequest>,
) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.series(&request) {
        Ok(series) => ok_json(series),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<P, C>(State(service): State<SharedService<P, C>>) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.history() {
        Ok(view) => ok_json(view),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn alerts_handler<P, C>(State(service): State<SharedService<P, C>>) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.alerts() {
        Ok(alerts) => ok_json(alerts),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn clear_alerts_handler<P, C>(
    State(service): State<SharedService<P, C>>,
) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.clear_alerts() {
        Ok(cleared) => ok_json(json!({ "cleared": cleared })),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dismiss_alert_handler<P, C>(
    State(service): State<SharedService<P, C>>,
    Path(alert_id): Path<String>,
) -> Response
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    match service.dismiss_alert(&alert_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}
