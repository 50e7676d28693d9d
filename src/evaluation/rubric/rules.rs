use std::collections::HashSet;

use crate::evaluation::log::{ActionEntry, ActionKind};
use super::config::RubricConfig;

/// Per-session counts every scoring pass is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTally {
    pub file_uploaded: bool,
    pub form_submitted: bool,
    pub invalid_submits: u32,
    pub invalid_files: u32,
    pub distinct_invalid_ids: u32,
    pub hints: u32,
}

impl ActionTally {
    pub fn from_entries(entries: &[ActionEntry]) -> Self {
        let mut tally = Self::default();
        let mut seen_ids: HashSet<&str> = HashSet::new();

        for entry in entries {
            match entry.kind() {
                ActionKind::FileUploadValid => tally.file_uploaded = true,
                ActionKind::FormSubmitSuccess => tally.form_submitted = true,
                ActionKind::FormSubmitInvalid => tally.invalid_submits += 1,
                ActionKind::FileUploadInvalid => tally.invalid_files += 1,
                ActionKind::HintRequest => tally.hints += 1,
                ActionKind::InvalidIdAttempt => {
                    if let Some(id) = entry.action.invalid_id() {
                        if seen_ids.insert(id) {
                            tally.distinct_invalid_ids += 1;
                        }
                    }
                }
                ActionKind::FieldBlur => {}
            }
        }

        tally
    }

    pub fn tasks_completed(&self) -> u32 {
        u32::from(self.form_submitted) + u32::from(self.file_uploaded)
    }

    /// Points earned from completed tasks.
    pub fn credits(&self, rubric: &RubricConfig) -> i64 {
        let mut credits = 0;
        if self.file_uploaded {
            credits += i64::from(rubric.upload_credit);
        }
        if self.form_submitted {
            credits += i64::from(rubric.submit_credit);
        }
        credits
    }

    pub fn penalties(&self) -> Vec<Penalty> {
        vec![
            Penalty::InvalidSubmits(self.invalid_submits),
            Penalty::InvalidFiles(self.invalid_files),
            Penalty::InvalidIds(self.distinct_invalid_ids),
            Penalty::Hints(self.hints),
        ]
    }

    pub fn penalty_total(&self, rubric: &RubricConfig) -> i64 {
        self.penalties()
            .iter()
            .map(|penalty| penalty.points(rubric))
            .sum()
    }
}

/// A penalised behaviour and how many times it counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Penalty {
    InvalidSubmits(u32),
    InvalidFiles(u32),
    InvalidIds(u32),
    Hints(u32),
}

impl Penalty {
    pub fn count(self) -> u32 {
        match self {
            Penalty::InvalidSubmits(count)
            | Penalty::InvalidFiles(count)
            | Penalty::InvalidIds(count)
            | Penalty::Hints(count) => count,
        }
    }

    pub fn unit_points(self, rubric: &RubricConfig) -> u32 {
        match self {
            Penalty::InvalidSubmits(_) => rubric.invalid_submit_penalty,
            Penalty::InvalidFiles(_) => rubric.invalid_file_penalty,
            Penalty::InvalidIds(_) => rubric.invalid_id_penalty,
            Penalty::Hints(_) => rubric.hint_penalty,
        }
    }

    pub fn points(self, rubric: &RubricConfig) -> i64 {
        i64::from(self.count()) * i64::from(self.unit_points(rubric))
    }

    pub fn describe(self, rubric: &RubricConfig) -> String {
        let count = self.count();
        let points = self.points(rubric);
        match self {
            Penalty::InvalidSubmits(_) => {
                format!("attempted to submit the form with errors {count} time(s) (-{points})")
            }
            Penalty::InvalidFiles(_) => {
                format!("selected an invalid file {count} time(s) (-{points})")
            }
            Penalty::InvalidIds(_) => {
                format!("entered {count} distinct invalid CNP value(s) (-{points})")
            }
            Penalty::Hints(_) => format!("requested a hint {count} time(s) (-{points})"),
        }
    }
}

/// Clamp a raw signed score into `[0, max]`.
pub(crate) fn clamp_score(raw: i64, max: u32) -> u32 {
    raw.clamp(0, i64::from(max)) as u32
}
