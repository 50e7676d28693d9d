use super::calculator::EvaluationResult;
use super::log::ActionLog;
use super::rubric::{clamp_score, ActionTally, RubricConfig};

/// Optimistic running score: starts at the maximum and loses points per mistake.
///
/// Stateless; every call re-reads the whole log.
#[derive(Debug, Clone)]
pub struct LiveScoreProjection {
    rubric: RubricConfig,
}

impl LiveScoreProjection {
    pub fn new(rubric: RubricConfig) -> Self {
        Self { rubric }
    }

    pub fn project(&self, log: &ActionLog) -> u32 {
        let tally = ActionTally::from_entries(log.entries());
        let remaining = i64::from(self.rubric.max_score) - tally.penalty_total(&self.rubric);
        clamp_score(remaining, self.rubric.max_score)
    }

    /// Frozen final score when one exists, otherwise the live projection.
    pub fn project_or_frozen(&self, log: &ActionLog, frozen: Option<&EvaluationResult>) -> u32 {
        match frozen {
            Some(result) => result.score,
            None => self.project(log),
        }
    }
}

impl Default for LiveScoreProjection {
    fn default() -> Self {
        Self::new(RubricConfig::standard())
    }
}
