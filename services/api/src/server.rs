use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryChecklistRepository, SnapshotCatalog};
use crate::routes::with_checklist_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use subsidy_checklist::config::AppConfig;
use subsidy_checklist::error::AppError;
use subsidy_checklist::telemetry;
use subsidy_checklist::workflows::checklist::ChecklistService;
use tracing::{info, warn};

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

    let catalog = match args.snapshots.take() {
        Some(dir) => SnapshotCatalog::load_dir(&dir)?,
        None => {
            warn!("no snapshot directory given; every application will be reported as missing");
            SnapshotCatalog::default()
        }
    };
    let catalog = Arc::new(catalog);
    let checklist_service = Arc::new(
        ChecklistService::new(
            catalog.clone(),
            catalog,
            Arc::new(InMemoryChecklistRepository::default()),
            config.checklist.rules.clone(),
        )
        .with_default_merge(config.checklist.merge_mode()),
    );

    let app = with_checklist_routes(checklist_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        merge_mode = ?config.checklist.merge_mode(),
        "checklist service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
