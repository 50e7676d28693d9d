mod config;
mod policy;
mod rules;

pub use config::RubricConfig;
pub use policy::FeedbackTier;
pub use rules::{ActionTally, Penalty};

pub(crate) use policy::select_tier;
pub(crate) use rules::clamp_score;

/// Number of graded objectives: upload a valid document, submit the form.
pub const TOTAL_TASKS: u32 = 2;
