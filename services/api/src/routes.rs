use crate::infra::AppState;
use appointment_eval::exercise::{exercise_router, ExerciseState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

pub(crate) fn with_service_routes(state: ExerciseState) -> axum::Router {
    exercise_router(state)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/host/messages",
            axum::routing::get(host_messages_endpoint),
        )
        .route(
            "/api/v1/notifications",
            axum::routing::get(notifications_endpoint),
        )
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

/// Result payloads the session has posted to the host, oldest first.
pub(crate) async fn host_messages_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(state.host.payloads()))
}

pub(crate) async fn notifications_endpoint(
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(state.notifications.notifications()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryHostChannel, InMemoryNotificationFeed};
    use appointment_eval::evaluation::{
        ActionLog, EvaluationResultPayload, FinalScoreCalculator, Notification, Notifier,
        ResultListener,
    };
    use axum::response::Response;
    use chrono::Utc;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            host: Arc::new(InMemoryHostChannel::default()),
            notifications: Arc::new(InMemoryNotificationFeed::default()),
        }
    }

    async fn read_json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let starting = readiness_endpoint(Extension(state(false)))
            .await
            .into_response();
        let ready = readiness_endpoint(Extension(state(true)))
            .await
            .into_response();

        assert_eq!(starting.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn host_messages_lists_emitted_payloads() {
        let state = state(true);
        let result = FinalScoreCalculator::default().calculate(&ActionLog::new());
        state
            .host
            .emit(EvaluationResultPayload::from_result(&result, Utc::now()))
            .expect("emits");

        let response = host_messages_endpoint(Extension(state))
            .await
            .into_response();
        let body = read_json_body(response).await;

        assert_eq!(body[0]["type"], "evaluationResult");
        assert_eq!(body[0]["score"], 0);
        assert_eq!(body[0]["totalTasks"], 2);
    }

    #[tokio::test]
    async fn notifications_lists_feed_entries() {
        let state = state(true);
        state
            .notifications
            .notify(Notification::success("Appointment submitted successfully!"))
            .expect("notifies");

        let response = notifications_endpoint(Extension(state))
            .await
            .into_response();
        let body = read_json_body(response).await;

        assert_eq!(body[0]["level"], "success");
        assert_eq!(body[0]["message"], "Appointment submitted successfully!");
    }
}
