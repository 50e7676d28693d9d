use appointment_eval::evaluation::{
    EvaluationResultPayload, ListenerError, Notification, Notifier, NotifyError, ResultListener,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) host: Arc<InMemoryHostChannel>,
    pub(crate) notifications: Arc<InMemoryNotificationFeed>,
}

/// Stands in for the hosting page: keeps every emitted result so it can be polled.
#[derive(Default)]
pub(crate) struct InMemoryHostChannel {
    payloads: Mutex<Vec<EvaluationResultPayload>>,
}

impl ResultListener for InMemoryHostChannel {
    fn emit(&self, payload: EvaluationResultPayload) -> Result<(), ListenerError> {
        info!(
            score = payload.score,
            max_score = payload.max_score,
            details = %payload.details,
            "evaluation result posted to host"
        );
        let mut guard = self.payloads.lock().expect("host channel mutex poisoned");
        guard.push(payload);
        Ok(())
    }
}

impl InMemoryHostChannel {
    pub(crate) fn payloads(&self) -> Vec<EvaluationResultPayload> {
        self.payloads
            .lock()
            .expect("host channel mutex poisoned")
            .clone()
    }
}

#[derive(Default)]
pub(crate) struct InMemoryNotificationFeed {
    notifications: Mutex<Vec<Notification>>,
}

impl Notifier for InMemoryNotificationFeed {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(level = ?notification.level, message = %notification.message, "notification");
        let mut guard = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationFeed {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Media type from the file extension, for uploads that did not declare one.
pub(crate) fn guess_media_type(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_from_extension() {
        assert_eq!(
            guess_media_type("act de identitate.jpg").as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            guess_media_type("trimitere medicala.pdf").as_deref(),
            Some("application/pdf")
        );
        assert_eq!(guess_media_type("istoric medical"), None);
    }
}
