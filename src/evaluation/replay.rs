use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::log::{Action, ActionKind};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read action log: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid action log CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unknown action kind '{kind}'")]
    UnknownKind { line: usize, kind: String },
    #[error("line {line}: {kind} requires a value")]
    MissingValue { line: usize, kind: &'static str },
}

#[derive(Debug, Deserialize)]
struct ReplayRow {
    kind: String,
    #[serde(default)]
    value: Option<String>,
}

/// Loads a recorded action sequence from a `kind,value` CSV export.
pub struct ActionLogReplay;

impl ActionLogReplay {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Action>, ReplayError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Action>, ReplayError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut actions = Vec::new();
        for (index, row) in csv_reader.deserialize::<ReplayRow>().enumerate() {
            // header occupies line 1
            let line = index + 2;
            actions.push(row_to_action(row?, line)?);
        }
        Ok(actions)
    }
}

fn row_to_action(row: ReplayRow, line: usize) -> Result<Action, ReplayError> {
    let kind = ActionKind::from_label(&row.kind).ok_or_else(|| ReplayError::UnknownKind {
        line,
        kind: row.kind.clone(),
    })?;
    let value = row.value.filter(|value| !value.is_empty());

    let action = match kind {
        ActionKind::FieldBlur => Action::FieldBlur {
            field: value.unwrap_or_default(),
        },
        ActionKind::FileUploadValid => Action::FileUploadValid {
            file_name: value.unwrap_or_default(),
        },
        ActionKind::FileUploadInvalid => Action::FileUploadInvalid {
            file_name: value.unwrap_or_default(),
            violations: Vec::new(),
        },
        ActionKind::InvalidIdAttempt => Action::InvalidIdAttempt {
            id: value.ok_or(ReplayError::MissingValue {
                line,
                kind: kind.label(),
            })?,
        },
        ActionKind::FormSubmitInvalid => Action::FormSubmitInvalid {
            fields: value
                .map(|raw| {
                    raw.split(';')
                        .map(str::trim)
                        .filter(|field| !field.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        },
        ActionKind::FormSubmitSuccess => Action::FormSubmitSuccess,
        ActionKind::HintRequest => Action::HintRequest,
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_in_order() {
        let csv = "kind,value\n\
                   field_blur,fullName\n\
                   invalid_id_attempt,1234567890123\n\
                   form_submit_invalid,cnp;symptoms\n\
                   hint_request,\n\
                   file_upload_valid,act de identitate.jpg\n\
                   form_submit_success,\n";

        let actions = ActionLogReplay::from_reader(Cursor::new(csv)).expect("parses");

        assert_eq!(actions.len(), 6);
        assert_eq!(
            actions[0],
            Action::FieldBlur {
                field: "fullName".to_string()
            }
        );
        assert_eq!(
            actions[2],
            Action::FormSubmitInvalid {
                fields: vec!["cnp".to_string(), "symptoms".to_string()]
            }
        );
        assert_eq!(actions[3], Action::HintRequest);
        assert_eq!(actions[5], Action::FormSubmitSuccess);
    }

    #[test]
    fn rejects_unknown_kind_with_line_number() {
        let csv = "kind,value\nhint_request,\nlogout,\n";
        match ActionLogReplay::from_reader(Cursor::new(csv)) {
            Err(ReplayError::UnknownKind { line, kind }) => {
                assert_eq!(line, 3);
                assert_eq!(kind, "logout");
            }
            other => panic!("expected unknown kind error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_id_attempt_requires_value() {
        let csv = "kind,value\ninvalid_id_attempt,\n";
        assert!(matches!(
            ActionLogReplay::from_reader(Cursor::new(csv)),
            Err(ReplayError::MissingValue { line: 2, .. })
        ));
    }
}
