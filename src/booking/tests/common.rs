use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::booking::{BookingService, DocumentCandidate, FieldUpdate, InMemoryKeyValueStore};
use crate::evaluation::{
    ActionKind, EvaluationResultPayload, EvaluationSession, ListenerError, Notification,
    Notifier, NotifyError, ResultListener,
};

pub(super) struct SilentHost;

impl ResultListener for SilentHost {
    fn emit(&self, _payload: EvaluationResultPayload) -> Result<(), ListenerError> {
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(super) fn all(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct Desk {
    pub(super) booking: BookingService,
    pub(super) session: EvaluationSession,
    pub(super) store: InMemoryKeyValueStore,
    pub(super) notifier: Arc<RecordingNotifier>,
}

impl Desk {
    pub(super) fn kinds(&self) -> Vec<ActionKind> {
        self.session
            .entries()
            .iter()
            .map(|entry| entry.kind())
            .collect()
    }
}

pub(super) fn desk_over(store: InMemoryKeyValueStore) -> Desk {
    let notifier = Arc::new(RecordingNotifier::default());
    let booking = BookingService::new(Arc::new(store.clone()), notifier.clone());
    let session = EvaluationSession::new(Arc::new(SilentHost), notifier.clone(), booking.drafts());
    Desk {
        booking,
        session,
        store,
        notifier,
    }
}

pub(super) fn desk() -> Desk {
    desk_over(InMemoryKeyValueStore::default())
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, 1).expect("valid date")
}

pub(super) fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 6, day).expect("valid date")
}

pub(super) fn identity_card() -> DocumentCandidate {
    DocumentCandidate::new("act de identitate.jpg", 1_258_291, "image/jpeg")
}

pub(super) fn invoice() -> DocumentCandidate {
    DocumentCandidate::new("factura_curent.pdf", 204_800, "application/pdf")
}

/// Valid in every field except the document, which has to be picked separately.
pub(super) fn fill_form(booking: &mut BookingService) {
    for update in [
        FieldUpdate::FullName("Popescu Ion".to_string()),
        FieldUpdate::Cnp("1960529460012".to_string()),
        FieldUpdate::Specialization("Family Medicine".to_string()),
        FieldUpdate::Doctor("Dr. Popescu Maria".to_string()),
        FieldUpdate::AppointmentDate(Some(day(4))),
        FieldUpdate::AppointmentTime("08:00".to_string()),
        FieldUpdate::Symptoms("Persistent cough for two weeks".to_string()),
        FieldUpdate::TermsAccepted(true),
    ] {
        booking.update_field(update);
    }
}
