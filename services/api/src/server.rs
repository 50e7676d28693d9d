use crate::cli::ServeArgs;
use crate::infra::{guess_media_type, AppState, InMemoryHostChannel, InMemoryNotificationFeed};
use crate::routes::with_service_routes;
use appointment_eval::booking::InMemoryKeyValueStore;
use appointment_eval::config::AppConfig;
use appointment_eval::error::AppError;
use appointment_eval::exercise::{ExerciseRuntime, ExerciseState};
use appointment_eval::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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
    let host = Arc::new(InMemoryHostChannel::default());
    let notifications = Arc::new(InMemoryNotificationFeed::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        host: host.clone(),
        notifications: notifications.clone(),
    };

    let runtime = ExerciseRuntime::new(
        host,
        notifications,
        Arc::new(InMemoryKeyValueStore::default()),
        &config.exercise,
    );
    let exercise_state = ExerciseState::new(runtime).with_media_type_guess(guess_media_type);

    let app = with_service_routes(exercise_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        hint_after_invalid_submits = config.exercise.advisories.invalid_submits_before_hint,
        hint_after_invalid_files = config.exercise.advisories.invalid_files_before_hint,
        "appointment exercise service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
