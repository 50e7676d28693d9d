use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of interaction kinds the rubric is defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    FieldBlur,
    FileUploadValid,
    FileUploadInvalid,
    InvalidIdAttempt,
    FormSubmitInvalid,
    FormSubmitSuccess,
    HintRequest,
}

impl ActionKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::FieldBlur,
            Self::FileUploadValid,
            Self::FileUploadInvalid,
            Self::InvalidIdAttempt,
            Self::FormSubmitInvalid,
            Self::FormSubmitSuccess,
            Self::HintRequest,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FieldBlur => "field_blur",
            Self::FileUploadValid => "file_upload_valid",
            Self::FileUploadInvalid => "file_upload_invalid",
            Self::InvalidIdAttempt => "invalid_id_attempt",
            Self::FormSubmitInvalid => "form_submit_invalid",
            Self::FormSubmitSuccess => "form_submit_success",
            Self::HintRequest => "hint_request",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.label() == normalized)
    }
}

/// A user interaction together with its kind-specific payload.
///
/// On the wire the payload may be omitted for every kind except `invalid_id_attempt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "payload",
    rename_all = "snake_case",
    try_from = "ActionRecord"
)]
pub enum Action {
    FieldBlur {
        field: String,
    },
    FileUploadValid {
        file_name: String,
    },
    FileUploadInvalid {
        file_name: String,
        violations: Vec<String>,
    },
    InvalidIdAttempt {
        id: String,
    },
    FormSubmitInvalid {
        fields: Vec<String>,
    },
    FormSubmitSuccess,
    HintRequest,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::FieldBlur { .. } => ActionKind::FieldBlur,
            Action::FileUploadValid { .. } => ActionKind::FileUploadValid,
            Action::FileUploadInvalid { .. } => ActionKind::FileUploadInvalid,
            Action::InvalidIdAttempt { .. } => ActionKind::InvalidIdAttempt,
            Action::FormSubmitInvalid { .. } => ActionKind::FormSubmitInvalid,
            Action::FormSubmitSuccess => ActionKind::FormSubmitSuccess,
            Action::HintRequest => ActionKind::HintRequest,
        }
    }

    /// The offending ID string for `InvalidIdAttempt`, used for deduplication.
    pub fn invalid_id(&self) -> Option<&str> {
        match self {
            Action::InvalidIdAttempt { id } => Some(id.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ActionPayload {
    #[serde(default)]
    field: String,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    violations: Vec<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ActionRecord {
    kind: ActionKind,
    #[serde(default)]
    payload: Option<ActionPayload>,
}

impl TryFrom<ActionRecord> for Action {
    type Error = String;

    fn try_from(record: ActionRecord) -> Result<Self, Self::Error> {
        let payload = record.payload.unwrap_or_default();
        let action = match record.kind {
            ActionKind::FieldBlur => Action::FieldBlur {
                field: payload.field,
            },
            ActionKind::FileUploadValid => Action::FileUploadValid {
                file_name: payload.file_name,
            },
            ActionKind::FileUploadInvalid => Action::FileUploadInvalid {
                file_name: payload.file_name,
                violations: payload.violations,
            },
            ActionKind::InvalidIdAttempt => Action::InvalidIdAttempt {
                id: payload
                    .id
                    .ok_or_else(|| "invalid_id_attempt requires payload.id".to_string())?,
            },
            ActionKind::FormSubmitInvalid => Action::FormSubmitInvalid {
                fields: payload.fields,
            },
            ActionKind::FormSubmitSuccess => Action::FormSubmitSuccess,
            ActionKind::HintRequest => Action::HintRequest,
        };
        Ok(action)
    }
}

/// Immutable, timestamped record appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: Action,
    pub timestamp: DateTime<Utc>,
}

impl ActionEntry {
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }
}

/// Append-only, insertion-ordered store of user actions.
///
/// The log has no notion of session state; finalize gating lives in the session.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Vec<ActionEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, action: Action) -> &ActionEntry {
        self.append_at(action, Utc::now())
    }

    /// Append with an explicit instant, clamped so timestamps never decrease.
    pub fn append_at(&mut self, action: Action, at: DateTime<Utc>) -> &ActionEntry {
        let timestamp = match self.entries.last() {
            Some(last) if last.timestamp > at => last.timestamp,
            _ => at,
        };
        self.entries.push(ActionEntry { action, timestamp });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind() == kind)
            .count()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
