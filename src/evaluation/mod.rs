//! Action logging and scoring for the booking exercise.
//!
//! Both scoring passes read the same [`ActionTally`] and [`RubricConfig`]: the live
//! projection counts down from the maximum, the final calculator counts up from zero.

pub mod calculator;
pub mod cnp;
pub mod host;
pub mod log;
pub mod projection;
pub mod replay;
pub mod rubric;
pub mod session;

#[cfg(test)]
mod tests;

pub use calculator::{DetailTag, EvaluationDetail, EvaluationResult, FinalScoreCalculator};
pub use host::{
    DraftDiscard, EvaluationResultPayload, ListenerError, Notification, NotificationLevel,
    Notifier, NotifyError, ResultListener, EVALUATION_RESULT_MESSAGE,
};
pub use log::{Action, ActionEntry, ActionKind, ActionLog};
pub use projection::LiveScoreProjection;
pub use replay::{ActionLogReplay, ReplayError};
pub use rubric::{ActionTally, FeedbackTier, Penalty, RubricConfig, TOTAL_TASKS};
pub use session::{AdvisoryConfig, EvaluationSession, SessionState};
