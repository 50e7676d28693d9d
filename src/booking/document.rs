use mime::Mime;
use serde::{Deserialize, Serialize};

/// Base names (extension stripped) the clinic accepts as supporting documents.
pub const ACCEPTED_DOCUMENT_NAMES: [&str; 3] =
    ["act de identitate", "trimitere medicala", "istoric medical"];

pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

fn accepted_media_types() -> [Mime; 3] {
    [mime::APPLICATION_PDF, mime::IMAGE_JPEG, mime::IMAGE_PNG]
}

/// A file the user picked, as described by the file browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCandidate {
    pub file_name: String,
    pub size_bytes: u64,
    pub media_type: String,
}

impl DocumentCandidate {
    pub fn new(
        file_name: impl Into<String>,
        size_bytes: u64,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
            media_type: media_type.into(),
        }
    }

    /// File name up to the last `.`; empty when there is no extension.
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(base, _)| base)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DocumentViolation {
    UnsupportedMediaType { media_type: String },
    TooLarge { size_bytes: u64 },
    UnrecognizedName { base_name: String },
}

impl DocumentViolation {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentViolation::UnsupportedMediaType { .. } => "media_type",
            DocumentViolation::TooLarge { .. } => "size",
            DocumentViolation::UnrecognizedName { .. } => "file_name",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DocumentViolation::UnsupportedMediaType { .. } => {
                "Invalid file format. Accepted: PDF, JPG, PNG.".to_string()
            }
            DocumentViolation::TooLarge { .. } => "The file exceeds the 5MB limit.".to_string(),
            DocumentViolation::UnrecognizedName { .. } => format!(
                "Invalid file name. Only these are allowed: {}.",
                ACCEPTED_DOCUMENT_NAMES.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentVerdict {
    Valid,
    Invalid(Vec<DocumentViolation>),
}

impl DocumentVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, DocumentVerdict::Valid)
    }
}

/// Apply the media-type, size and name rules; every failing rule is reported.
pub fn classify(candidate: &DocumentCandidate) -> DocumentVerdict {
    let mut violations = Vec::new();

    let media_type_ok = candidate
        .media_type
        .trim()
        .parse::<Mime>()
        .map(|parsed| {
            accepted_media_types().iter().any(|accepted| {
                accepted.type_() == parsed.type_() && accepted.subtype() == parsed.subtype()
            })
        })
        .unwrap_or(false);
    if !media_type_ok {
        violations.push(DocumentViolation::UnsupportedMediaType {
            media_type: candidate.media_type.clone(),
        });
    }

    if candidate.size_bytes > MAX_DOCUMENT_BYTES {
        violations.push(DocumentViolation::TooLarge {
            size_bytes: candidate.size_bytes,
        });
    }

    let base_name = candidate.base_name();
    if !ACCEPTED_DOCUMENT_NAMES.contains(&base_name) {
        violations.push(DocumentViolation::UnrecognizedName {
            base_name: base_name.to_string(),
        });
    }

    if violations.is_empty() {
        DocumentVerdict::Valid
    } else {
        DocumentVerdict::Invalid(violations)
    }
}
