use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use papel_checker::checker::EssayChecker;
use papel_checker::completion::GroqClient;
use papel_checker::config::AppConfig;
use papel_checker::error::AppError;
use papel_checker::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let addr = config.server.socket_addr()?;
    let environment = config.environment;
    let client = GroqClient::new(config.completion)?;
    let checker = Arc::new(EssayChecker::new(Arc::new(client)));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model: Arc::from(checker.model()),
    };

    let app = with_service_routes(checker)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?environment, %addr, "konseptong papel checker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
