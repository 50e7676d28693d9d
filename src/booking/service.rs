use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::appointments::{Appointment, AppointmentBook};
use super::catalog::is_slot_available;
use super::document::{classify, DocumentCandidate, DocumentVerdict};
use super::form::{validate_draft, AppointmentDraft, FieldUpdate, FormErrors, FormField};
use super::storage::{DraftStore, KeyValueStore, StorageError};
use crate::evaluation::{cnp, Action, EvaluationSession, Notification, Notifier};

pub const DOCUMENT_ACCEPTED: &str = "File selected successfully!";
pub const APPOINTMENT_BOOKED: &str = "Appointment submitted successfully!";

/// Result of pressing submit on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Booked { appointment: Appointment },
    Rejected { errors: FormErrors },
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("draft is missing {0}")]
    IncompleteDraft(FormField),
}

/// Drives the booking form and reports every evaluated interaction to the session.
pub struct BookingService {
    draft: AppointmentDraft,
    drafts: Arc<DraftStore>,
    book: AppointmentBook,
    notifier: Arc<dyn Notifier>,
}

impl BookingService {
    /// Build the service over `store`, restoring any saved draft.
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let drafts = Arc::new(DraftStore::new(store.clone()));
        let draft = drafts.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not restore form draft; starting blank");
            AppointmentDraft::default()
        });

        Self {
            draft,
            drafts,
            book: AppointmentBook::new(store),
            notifier,
        }
    }

    pub fn draft(&self) -> &AppointmentDraft {
        &self.draft
    }

    /// Handle shared with the session so a reset also clears the saved draft.
    pub fn drafts(&self) -> Arc<DraftStore> {
        self.drafts.clone()
    }

    pub fn errors(&self, today: NaiveDate) -> FormErrors {
        validate_draft(&self.draft, today)
    }

    pub fn appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        Ok(self.book.list()?)
    }

    pub fn cancel(&self, id: &str) -> Result<bool, BookingError> {
        let removed = self.book.cancel(id)?;
        info!(%id, removed, "appointment cancellation requested");
        Ok(removed)
    }

    /// Apply one edit. Changing the specialization clears the doctor and time; a time
    /// the doctor cannot take on the chosen date is cleared.
    pub fn update_field(&mut self, update: FieldUpdate) {
        let field = update.field();
        match update {
            FieldUpdate::FullName(value) => self.draft.full_name = value,
            FieldUpdate::Cnp(value) => self.draft.cnp = value,
            FieldUpdate::Specialization(value) => {
                self.draft.specialization = value;
                self.draft.doctor.clear();
                self.draft.appointment_time.clear();
            }
            FieldUpdate::Doctor(value) => self.draft.doctor = value,
            FieldUpdate::AppointmentDate(value) => self.draft.appointment_date = value,
            FieldUpdate::AppointmentTime(value) => self.draft.appointment_time = value,
            FieldUpdate::Symptoms(value) => self.draft.symptoms = value,
            FieldUpdate::TermsAccepted(value) => self.draft.terms_accepted = value,
        }

        if let Some(date) = self.draft.appointment_date {
            if !self.draft.doctor.is_empty()
                && !self.draft.appointment_time.is_empty()
                && !is_slot_available(&self.draft.doctor, date, &self.draft.appointment_time)
            {
                debug!(time = %self.draft.appointment_time, "chosen slot unavailable; cleared");
                self.draft.appointment_time.clear();
            }
        }

        debug!(field = field.label(), "form field updated");
        self.save_draft();
    }

    /// Record that the user left `field`. Leaving a non-empty, invalid CNP also counts
    /// as an invalid identifier attempt.
    pub fn blur_field(&self, session: &mut EvaluationSession, field: FormField) {
        session.record(Action::FieldBlur {
            field: field.label().to_string(),
        });

        if field == FormField::Cnp && !self.draft.cnp.is_empty() && !cnp::validate(&self.draft.cnp)
        {
            session.record(Action::InvalidIdAttempt {
                id: self.draft.cnp.clone(),
            });
        }
    }

    /// Classify a picked file. Exactly one upload action is recorded per attempt; only a
    /// valid file replaces the document on the form.
    pub fn pick_document(
        &mut self,
        session: &mut EvaluationSession,
        candidate: DocumentCandidate,
    ) -> DocumentVerdict {
        let verdict = classify(&candidate);
        match &verdict {
            DocumentVerdict::Valid => {
                session.record(Action::FileUploadValid {
                    file_name: candidate.file_name.clone(),
                });
                info!(file_name = %candidate.file_name, "document accepted");
                self.draft.identity_document = Some(candidate);
                self.deliver(Notification::success(DOCUMENT_ACCEPTED));
            }
            DocumentVerdict::Invalid(violations) => {
                session.record(Action::FileUploadInvalid {
                    file_name: candidate.file_name.clone(),
                    violations: violations
                        .iter()
                        .map(|violation| violation.label().to_string())
                        .collect(),
                });
                debug!(file_name = %candidate.file_name, ?violations, "document rejected");
                if let Some(first) = violations.first() {
                    self.deliver(Notification::error(first.message()));
                }
            }
        }
        verdict
    }

    /// Submit the form. An invalid form is logged with its failing fields; a valid one is
    /// booked, logged as a success and cleared.
    pub fn submit(
        &mut self,
        session: &mut EvaluationSession,
        today: NaiveDate,
    ) -> Result<SubmitOutcome, BookingError> {
        let errors = validate_draft(&self.draft, today);
        if !errors.is_empty() {
            session.record(Action::FormSubmitInvalid {
                fields: errors.keys().map(|field| field.label().to_string()).collect(),
            });
            debug!(failing = errors.len(), "form submitted with errors");
            return Ok(SubmitOutcome::Rejected { errors });
        }

        let appointment = self.book.add(&self.draft)?;
        session.record(Action::FormSubmitSuccess);
        info!(id = %appointment.id, doctor = %appointment.doctor, "appointment booked");
        self.deliver(Notification::success(APPOINTMENT_BOOKED));

        self.draft = AppointmentDraft::default();
        if let Err(err) = self.drafts.discard() {
            warn!(error = %err, "failed to clear saved form draft");
        }
        Ok(SubmitOutcome::Booked { appointment })
    }

    /// Blank the in-memory form; the stored draft is discarded by the session reset.
    pub fn clear_form(&mut self) {
        self.draft = AppointmentDraft::default();
    }

    fn save_draft(&self) {
        if let Err(err) = self.drafts.save(&self.draft) {
            warn!(error = %err, "failed to save form draft");
        }
    }

    fn deliver(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(notification) {
            warn!(error = %err, "failed to surface notification");
        }
    }
}
