use serde::{Deserialize, Serialize};

use super::log::ActionLog;
use super::rubric::{clamp_score, select_tier, ActionTally, FeedbackTier, RubricConfig, TOTAL_TASKS};

/// Whether a detail line credits or faults the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailTag {
    Correct,
    Incorrect,
}

/// One human-readable line of the evaluation breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationDetail {
    pub text: String,
    pub tag: DetailTag,
}

impl EvaluationDetail {
    fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: DetailTag::Correct,
        }
    }

    fn incorrect(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: DetailTag::Incorrect,
        }
    }
}

/// Authoritative, frozen outcome of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: u32,
    pub max_score: u32,
    pub feedback: String,
    pub tier: FeedbackTier,
    pub details: Vec<EvaluationDetail>,
    pub tasks_completed: u32,
    pub total_tasks: u32,
}

impl EvaluationResult {
    /// Detail texts joined the way the host channel expects them.
    pub fn details_text(&self) -> String {
        self.details
            .iter()
            .map(|detail| detail.text.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Pessimistic one-shot scorer: starts at zero and earns credit per completed task.
#[derive(Debug, Clone)]
pub struct FinalScoreCalculator {
    rubric: RubricConfig,
}

impl FinalScoreCalculator {
    pub fn new(rubric: RubricConfig) -> Self {
        Self { rubric }
    }

    pub fn calculate(&self, log: &ActionLog) -> EvaluationResult {
        let rubric = &self.rubric;
        let tally = ActionTally::from_entries(log.entries());
        let mut details = Vec::new();

        if tally.file_uploaded {
            details.push(EvaluationDetail::correct(format!(
                "uploaded a valid document (+{})",
                rubric.upload_credit
            )));
        } else {
            details.push(EvaluationDetail::incorrect("did not upload a valid document"));
        }

        if tally.form_submitted {
            details.push(EvaluationDetail::correct(format!(
                "submitted the form successfully (+{})",
                rubric.submit_credit
            )));
        } else {
            details.push(EvaluationDetail::incorrect(
                "did not submit the form successfully",
            ));
        }

        for penalty in tally.penalties() {
            if penalty.count() > 0 {
                details.push(EvaluationDetail::incorrect(penalty.describe(rubric)));
            }
        }

        // stable: evaluation order is kept inside each tag group
        details.sort_by_key(|detail| detail.tag);

        let raw = tally.credits(rubric) - tally.penalty_total(rubric);
        let score = clamp_score(raw, rubric.max_score);
        let tasks_completed = tally.tasks_completed();
        let tier = select_tier(score, tasks_completed, TOTAL_TASKS);

        EvaluationResult {
            score,
            max_score: rubric.max_score,
            feedback: tier.message().to_string(),
            tier,
            details,
            tasks_completed,
            total_tasks: TOTAL_TASKS,
        }
    }
}

impl Default for FinalScoreCalculator {
    fn default() -> Self {
        Self::new(RubricConfig::standard())
    }
}
