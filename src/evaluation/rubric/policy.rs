use serde::{Deserialize, Serialize};

/// Summary feedback bands, checked from harshest to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    NoCorrectAction,
    ObjectivesIncomplete,
    CompletedWithMistakes,
    MinorMistakes,
    Excellent,
}

impl FeedbackTier {
    pub fn message(self) -> &'static str {
        match self {
            FeedbackTier::NoCorrectAction => {
                "You did not perform any correct action. Review the requirements and try again."
            }
            FeedbackTier::ObjectivesIncomplete => {
                "You did not complete all objectives. Review the steps and make sure you finish the whole process."
            }
            FeedbackTier::CompletedWithMistakes => {
                "You finished the exercise, but with many mistakes. More attention to detail would have earned a better score."
            }
            FeedbackTier::MinorMistakes => {
                "Congratulations! You finished the exercise successfully with only a few minor mistakes."
            }
            FeedbackTier::Excellent => {
                "Excellent performance! You finished the exercise quickly and efficiently."
            }
        }
    }
}

const COMPLETED_WITH_MISTAKES_BELOW: u32 = 70;
const MINOR_MISTAKES_BELOW: u32 = 95;

pub(crate) fn select_tier(
    final_score: u32,
    tasks_completed: u32,
    total_tasks: u32,
) -> FeedbackTier {
    if final_score == 0 && tasks_completed == 0 {
        return FeedbackTier::NoCorrectAction;
    }

    if tasks_completed < total_tasks {
        return FeedbackTier::ObjectivesIncomplete;
    }

    if final_score < COMPLETED_WITH_MISTAKES_BELOW {
        return FeedbackTier::CompletedWithMistakes;
    }

    if final_score < MINOR_MISTAKES_BELOW {
        return FeedbackTier::MinorMistakes;
    }

    FeedbackTier::Excellent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_first_match_order() {
        assert_eq!(select_tier(0, 0, 2), FeedbackTier::NoCorrectAction);
        assert_eq!(select_tier(0, 1, 2), FeedbackTier::ObjectivesIncomplete);
        assert_eq!(select_tier(40, 1, 2), FeedbackTier::ObjectivesIncomplete);
        assert_eq!(select_tier(0, 2, 2), FeedbackTier::CompletedWithMistakes);
        assert_eq!(select_tier(69, 2, 2), FeedbackTier::CompletedWithMistakes);
        assert_eq!(select_tier(70, 2, 2), FeedbackTier::MinorMistakes);
        assert_eq!(select_tier(94, 2, 2), FeedbackTier::MinorMistakes);
        assert_eq!(select_tier(95, 2, 2), FeedbackTier::Excellent);
        assert_eq!(select_tier(100, 2, 2), FeedbackTier::Excellent);
    }
}
