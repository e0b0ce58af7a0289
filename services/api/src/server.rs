use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use grant_ai::config::AppConfig;
use grant_ai::error::AppError;
use grant_ai::telemetry;
use grant_ai::workflows::assessment::{
    AssessmentApi, AssessmentEngine, HttpCompletionClient,
};
use grant_ai::workflows::templating::TemplateEngine;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(HttpCompletionClient::from_config(&config.completion)?);
    let api = AssessmentApi {
        engine: Arc::new(AssessmentEngine::new(gateway)),
        templates: Arc::new(TemplateEngine::new()),
    };

    let app = with_assessment_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.completion.model, "grant assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
