use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState, InMemoryAlertPublisher};
use crate::routes::with_quality_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fleet_quality::config::AppConfig;
use fleet_quality::error::AppError;
use fleet_quality::quality::QualityService;
use fleet_quality::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed.take() {
        config.quality.seed = seed;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let service = Arc::new(QualityService::new(build_engine(&config.quality), alerts));

    let app = with_quality_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seed = config.quality.seed,
        "fleet quality service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
