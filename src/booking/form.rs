use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{doctors_for, is_slot_available};
use super::document::{classify, DocumentCandidate, DocumentVerdict};
use crate::evaluation::cnp;

const MIN_SYMPTOMS_CHARS: usize = 10;

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Cnp,
    Specialization,
    Doctor,
    AppointmentDate,
    AppointmentTime,
    Symptoms,
    IdentityDocument,
    TermsAccepted,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::FullName,
        FormField::Cnp,
        FormField::Specialization,
        FormField::Doctor,
        FormField::AppointmentDate,
        FormField::AppointmentTime,
        FormField::Symptoms,
        FormField::IdentityDocument,
        FormField::TermsAccepted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::Cnp => "cnp",
            FormField::Specialization => "specialization",
            FormField::Doctor => "doctor",
            FormField::AppointmentDate => "appointmentDate",
            FormField::AppointmentTime => "appointmentTime",
            FormField::Symptoms => "symptoms",
            FormField::IdentityDocument => "identityDocument",
            FormField::TermsAccepted => "termsAccepted",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// In-progress booking form. The picked document is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentDraft {
    pub full_name: String,
    pub cnp: String,
    pub specialization: String,
    pub doctor: String,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: String,
    pub symptoms: String,
    #[serde(skip)]
    pub identity_document: Option<DocumentCandidate>,
    pub terms_accepted: bool,
}

/// A single edit coming from the form, e.g. `{ "field": "cnp", "value": "1960529460012" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    FullName(String),
    Cnp(String),
    Specialization(String),
    Doctor(String),
    AppointmentDate(Option<NaiveDate>),
    AppointmentTime(String),
    Symptoms(String),
    TermsAccepted(bool),
}

impl FieldUpdate {
    pub fn field(&self) -> FormField {
        match self {
            FieldUpdate::FullName(_) => FormField::FullName,
            FieldUpdate::Cnp(_) => FormField::Cnp,
            FieldUpdate::Specialization(_) => FormField::Specialization,
            FieldUpdate::Doctor(_) => FormField::Doctor,
            FieldUpdate::AppointmentDate(_) => FormField::AppointmentDate,
            FieldUpdate::AppointmentTime(_) => FormField::AppointmentTime,
            FieldUpdate::Symptoms(_) => FormField::Symptoms,
            FieldUpdate::TermsAccepted(_) => FormField::TermsAccepted,
        }
    }
}

pub type FormErrors = BTreeMap<FormField, String>;

/// Validation message for one field, or `None` when it is acceptable.
pub fn validate_field(
    field: FormField,
    draft: &AppointmentDraft,
    today: NaiveDate,
) -> Option<String> {
    let message = match field {
        FormField::FullName => {
            if draft.full_name.trim().split(' ').count() < 2 {
                "Full name must contain at least two words."
            } else {
                return None;
            }
        }
        FormField::Cnp => {
            let shaped = draft.cnp.len() == 13 && draft.cnp.bytes().all(|b| b.is_ascii_digit());
            if !shaped {
                "The CNP must contain exactly 13 digits."
            } else if !cnp::validate(&draft.cnp) {
                "The CNP entered is not valid."
            } else {
                return None;
            }
        }
        FormField::Specialization => {
            if draft.specialization.is_empty() {
                "Please select a specialization."
            } else {
                return None;
            }
        }
        FormField::Doctor => {
            if draft.doctor.is_empty() {
                "Please select a doctor."
            } else if !doctors_for(&draft.specialization)
                .iter()
                .any(|doctor| doctor.name == draft.doctor)
            {
                "The selected doctor does not practise this specialization."
            } else {
                return None;
            }
        }
        FormField::AppointmentDate => match draft.appointment_date {
            None => "Please select a date.",
            Some(date) if date < today => "The date cannot be in the past.",
            Some(_) => return None,
        },
        FormField::AppointmentTime => {
            if draft.appointment_time.is_empty() {
                "Please select a time."
            } else {
                match draft.appointment_date {
                    Some(date)
                        if !draft.doctor.is_empty()
                            && !is_slot_available(&draft.doctor, date, &draft.appointment_time) =>
                    {
                        "The selected time slot is not available."
                    }
                    _ => return None,
                }
            }
        }
        FormField::Symptoms => {
            if draft.symptoms.trim().chars().count() < MIN_SYMPTOMS_CHARS {
                "Please describe your symptoms (at least 10 characters)."
            } else {
                return None;
            }
        }
        FormField::IdentityDocument => match &draft.identity_document {
            None => "An identity document is required.",
            Some(candidate) => {
                return match classify(candidate) {
                    DocumentVerdict::Valid => None,
                    DocumentVerdict::Invalid(violations) => {
                        violations.first().map(|violation| violation.message())
                    }
                };
            }
        },
        FormField::TermsAccepted => {
            if draft.terms_accepted {
                return None;
            }
            "You must agree to the processing of personal data."
        }
    };
    Some(message.to_string())
}

/// Every failing field with its message, in form order.
pub fn validate_draft(draft: &AppointmentDraft, today: NaiveDate) -> FormErrors {
    FormField::ALL
        .iter()
        .filter_map(|field| validate_field(*field, draft, today).map(|message| (*field, message)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn complete_draft() -> AppointmentDraft {
        AppointmentDraft {
            full_name: "Popescu Ion".to_string(),
            cnp: "1960529460012".to_string(),
            specialization: "Family Medicine".to_string(),
            doctor: "Dr. Popescu Maria".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2025, 6, 4),
            appointment_time: "08:00".to_string(),
            symptoms: "Persistent headache for a week".to_string(),
            identity_document: Some(DocumentCandidate::new(
                "act de identitate.jpg",
                1024 * 1024,
                "image/jpeg",
            )),
            terms_accepted: true,
        }
    }

    #[test]
    fn complete_draft_has_no_errors() {
        assert!(validate_draft(&complete_draft(), today()).is_empty());
    }

    #[test]
    fn blank_draft_fails_every_field() {
        let errors = validate_draft(&AppointmentDraft::default(), today());
        let fields: Vec<_> = errors.keys().copied().collect();
        assert_eq!(fields, FormField::ALL.to_vec());
    }

    #[test]
    fn full_name_needs_two_words() {
        let mut draft = complete_draft();
        for name in ["Ion", "  Ion  ", ""] {
            draft.full_name = name.to_string();
            assert!(validate_field(FormField::FullName, &draft, today()).is_some(), "{name:?}");
        }
        draft.full_name = " Ion Popescu ".to_string();
        assert!(validate_field(FormField::FullName, &draft, today()).is_none());
    }

    #[test]
    fn cnp_shape_and_checksum_have_distinct_messages() {
        let mut draft = complete_draft();
        draft.cnp = "12345".to_string();
        let shape = validate_field(FormField::Cnp, &draft, today());
        draft.cnp = "1960529460013".to_string();
        let checksum = validate_field(FormField::Cnp, &draft, today());

        assert_eq!(shape.as_deref(), Some("The CNP must contain exactly 13 digits."));
        assert_eq!(checksum.as_deref(), Some("The CNP entered is not valid."));
    }

    #[test]
    fn doctor_must_practise_the_chosen_specialization() {
        let mut draft = complete_draft();
        draft.specialization = "Cardiology".to_string();
        assert!(validate_field(FormField::Doctor, &draft, today()).is_some());
    }

    #[test]
    fn past_dates_are_rejected_but_today_is_fine() {
        let mut draft = complete_draft();
        draft.appointment_date = today().pred_opt();
        assert_eq!(
            validate_field(FormField::AppointmentDate, &draft, today()).as_deref(),
            Some("The date cannot be in the past.")
        );
        draft.appointment_date = Some(today());
        assert!(validate_field(FormField::AppointmentDate, &draft, today()).is_none());
    }

    #[test]
    fn blocked_slot_is_rejected() {
        let mut draft = complete_draft();
        draft.appointment_time = "09:30".to_string();
        assert_eq!(
            validate_field(FormField::AppointmentTime, &draft, today()).as_deref(),
            Some("The selected time slot is not available.")
        );
    }

    #[test]
    fn symptoms_are_measured_after_trimming() {
        let mut draft = complete_draft();
        draft.symptoms = "   headache   ".to_string();
        assert!(validate_field(FormField::Symptoms, &draft, today()).is_some());
        draft.symptoms = "headache!!".to_string();
        assert!(validate_field(FormField::Symptoms, &draft, today()).is_none());
    }

    #[test]
    fn invalid_document_reports_first_violation() {
        let mut draft = complete_draft();
        draft.identity_document = Some(DocumentCandidate::new(
            "Poza pasaport.tiff",
            6 * 1024 * 1024,
            "image/tiff",
        ));
        assert_eq!(
            validate_field(FormField::IdentityDocument, &draft, today()).as_deref(),
            Some("Invalid file format. Accepted: PDF, JPG, PNG.")
        );
    }

    #[test]
    fn draft_json_omits_document_and_uses_form_names() {
        let value = serde_json::to_value(complete_draft()).expect("serializes");
        assert_eq!(value["fullName"], "Popescu Ion");
        assert_eq!(value["appointmentDate"], "2025-06-04");
        assert!(value.get("identityDocument").is_none());

        let restored: AppointmentDraft = serde_json::from_value(value).expect("deserializes");
        assert!(restored.identity_document.is_none());
        assert_eq!(restored.cnp, "1960529460012");
    }

    #[test]
    fn field_update_uses_adjacent_tagging() {
        let update: FieldUpdate =
            serde_json::from_str(r#"{"field":"termsAccepted","value":true}"#).expect("parses");
        assert_eq!(update, FieldUpdate::TermsAccepted(true));
        assert_eq!(update.field(), FormField::TermsAccepted);
    }
}
