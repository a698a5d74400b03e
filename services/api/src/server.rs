use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryContractRepository, OutboxAlertPublisher};
use crate::routes::with_contract_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use contract_watch::config::AppConfig;
use contract_watch::error::AppError;
use contract_watch::telemetry;
use contract_watch::workflows::contracts::ContractLifecycleService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type ServeService = ContractLifecycleService<InMemoryContractRepository, OutboxAlertPublisher>;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service: Arc<ServeService> = Arc::new(ContractLifecycleService::new(
        Arc::new(InMemoryContractRepository::default()),
        Arc::new(OutboxAlertPublisher::default()),
    ));

    if let Some(interval) = config.reminders.sweep_interval {
        spawn_reminder_sweep(service.clone(), interval);
    }

    let app = with_contract_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "contract watch ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_reminder_sweep(service: Arc<ServeService>, every: Duration) {
    info!(seconds = every.as_secs(), "reminder sweep scheduled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(err) = service.dispatch_due(Utc::now().date_naive()) {
                warn!(error = %err, "reminder sweep failed");
            }
        }
    });
}
