use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::calculator::EvaluationResult;

/// Message type the hosting page filters on.
pub const EVALUATION_RESULT_MESSAGE: &str = "evaluationResult";

/// Payload delivered to the hosting environment once a session is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResultPayload {
    #[serde(rename = "type")]
    pub message_type: String,
    pub score: u32,
    pub max_score: u32,
    pub details: String,
    pub tasks_completed: u32,
    pub total_tasks: u32,
    pub extracted_text: String,
    pub timestamp: String,
}

impl EvaluationResultPayload {
    pub fn from_result(result: &EvaluationResult, at: DateTime<Utc>) -> Self {
        let details = result.details_text();
        Self {
            message_type: EVALUATION_RESULT_MESSAGE.to_string(),
            score: result.score,
            max_score: result.max_score,
            extracted_text: format!("{} {}", result.score, details),
            details,
            tasks_completed: result.tasks_completed,
            total_tasks: result.total_tasks,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Outbound channel to the hosting page (parent window, message bus, ...).
pub trait ResultListener: Send + Sync {
    fn emit(&self, payload: EvaluationResultPayload) -> Result<(), ListenerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("host channel unavailable: {0}")]
    Unavailable(String),
}

/// Severity of a user-facing toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Surface for advisories and confirmations shown to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification surface unavailable: {0}")]
    Unavailable(String),
}

/// Hook into the draft persistence collaborator so a reset starts from a blank form.
pub trait DraftDiscard: Send + Sync {
    fn discard_draft(&self) -> Result<(), crate::booking::StorageError>;
}
