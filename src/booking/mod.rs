//! The appointment form the exercise is played on: catalog, validation, document
//! checks, persistence, and the service that reports interactions to the session.

pub mod appointments;
pub mod catalog;
pub mod document;
pub mod form;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use appointments::{Appointment, AppointmentBook};
pub use catalog::{
    doctors_for, find_doctor, is_slot_available, unavailable_slots, Doctor, DOCTORS,
    SPECIALIZATIONS, TIME_SLOTS,
};
pub use document::{
    classify, DocumentCandidate, DocumentVerdict, DocumentViolation, ACCEPTED_DOCUMENT_NAMES,
    MAX_DOCUMENT_BYTES,
};
pub use form::{
    validate_draft, validate_field, AppointmentDraft, FieldUpdate, FormErrors, FormField,
};
pub use service::{
    BookingError, BookingService, SubmitOutcome, APPOINTMENT_BOOKED, DOCUMENT_ACCEPTED,
};
pub use storage::{
    DraftStore, InMemoryKeyValueStore, KeyValueStore, StorageError, APPOINTMENTS_STORAGE_KEY,
    FORM_STORAGE_KEY,
};
