use crate::cli::ServeArgs;
use crate::infra::{AppState, CsvSources, GenbaState, InMemoryGenbaStore};
use crate::routes::with_genba_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use genba_compliance::config::AppConfig;
use genba_compliance::error::AppError;
use genba_compliance::telemetry;
use genba_compliance::workflows::genba::activities::GenbaActivityService;
use genba_compliance::workflows::genba::{ComplianceScorer, MemoryPreferenceStore};
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = InMemoryGenbaStore::from_csv(&CsvSources {
        areas: args.areas,
        users: args.users,
        activities: args.activities,
    })?;
    let genba_state = GenbaState {
        store: store.clone(),
        scorer: Arc::new(ComplianceScorer::new(config.compliance.policy())),
        preferences: MemoryPreferenceStore::default(),
    };
    let activity_service = Arc::new(GenbaActivityService::new(
        Arc::new(store.clone()),
        Arc::new(store),
    ));

    let app = with_genba_routes(activity_service)
        .layer(Extension(genba_state))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        production_department = config.compliance.production_department.as_str(),
        rounding = ?config.compliance.rounding,
        "genba compliance service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
