use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::form::{AppointmentDraft, FormField};
use super::service::BookingError;
use super::storage::{KeyValueStore, StorageError, APPOINTMENTS_STORAGE_KEY};

const ID_PREFIX: &str = "appt-";

/// A confirmed booking. Only the document's file name is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub full_name: String,
    pub cnp: String,
    pub specialization: String,
    pub doctor: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub symptoms: String,
    pub identity_document_name: String,
}

impl Appointment {
    pub fn from_draft(id: String, draft: &AppointmentDraft) -> Result<Self, BookingError> {
        let appointment_date = draft
            .appointment_date
            .ok_or(BookingError::IncompleteDraft(FormField::AppointmentDate))?;
        let document = draft
            .identity_document
            .as_ref()
            .ok_or(BookingError::IncompleteDraft(FormField::IdentityDocument))?;

        Ok(Self {
            id,
            full_name: draft.full_name.clone(),
            cnp: draft.cnp.clone(),
            specialization: draft.specialization.clone(),
            doctor: draft.doctor.clone(),
            appointment_date,
            appointment_time: draft.appointment_time.clone(),
            symptoms: draft.symptoms.clone(),
            identity_document_name: document.file_name.clone(),
        })
    }
}

/// Booked appointments, stored as one JSON list.
pub struct AppointmentBook {
    store: Arc<dyn KeyValueStore>,
}

impl AppointmentBook {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored appointments in booking order. An unreadable list reads as empty.
    pub fn list(&self) -> Result<Vec<Appointment>, StorageError> {
        let Some(raw) = self.store.get(APPOINTMENTS_STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(appointments) => Ok(appointments),
            Err(source) => {
                let err = StorageError::Corrupt {
                    key: APPOINTMENTS_STORAGE_KEY.to_string(),
                    source,
                };
                warn!(error = %err, "ignoring unreadable appointment list");
                Ok(Vec::new())
            }
        }
    }

    pub fn add(&self, draft: &AppointmentDraft) -> Result<Appointment, BookingError> {
        let mut appointments = self.list()?;
        let appointment = Appointment::from_draft(next_id(&appointments), draft)?;
        appointments.push(appointment.clone());
        self.persist(&appointments)?;
        Ok(appointment)
    }

    /// Remove an appointment by id. Returns whether anything was removed.
    pub fn cancel(&self, id: &str) -> Result<bool, StorageError> {
        let mut appointments = self.list()?;
        let before = appointments.len();
        appointments.retain(|appointment| appointment.id != id);
        if appointments.len() == before {
            return Ok(false);
        }
        self.persist(&appointments)?;
        Ok(true)
    }

    fn persist(&self, appointments: &[Appointment]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(appointments)?;
        self.store.set(APPOINTMENTS_STORAGE_KEY, encoded)
    }
}

fn next_id(existing: &[Appointment]) -> String {
    let highest = existing
        .iter()
        .filter_map(|appointment| appointment.id.strip_prefix(ID_PREFIX)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{ID_PREFIX}{:06}", highest + 1)
}
