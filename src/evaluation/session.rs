use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::calculator::{EvaluationResult, FinalScoreCalculator};
use super::host::{
    DraftDiscard, EvaluationResultPayload, Notification, Notifier, ResultListener,
};
use super::log::{Action, ActionEntry, ActionKind, ActionLog};
use super::projection::LiveScoreProjection;
use super::rubric::RubricConfig;
use crate::booking::ACCEPTED_DOCUMENT_NAMES;

pub const REQUIRED_FIELDS_ADVISORY: &str =
    "Hint: make sure all required fields are filled in correctly.";
pub const ON_DEMAND_HINT: &str =
    "Hint: the main objective is to fill in and submit the form with a valid document.";

/// Thresholds for the one-time automatic advisory. Not part of the scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    pub invalid_submits_before_hint: usize,
    pub invalid_files_before_hint: usize,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            invalid_submits_before_hint: 2,
            invalid_files_before_hint: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Finalized,
}

/// Single-user exercise session: owns the action log and the finalize-once state machine.
///
/// After [`finalize`](Self::finalize) the log is frozen and the stored result never
/// changes; only [`reset`](Self::reset) brings the session back to a blank `Active` state.
pub struct EvaluationSession {
    log: ActionLog,
    projection: LiveScoreProjection,
    calculator: FinalScoreCalculator,
    advisories: AdvisoryConfig,
    hint_surfaced: bool,
    result: Option<EvaluationResult>,
    host: Arc<dyn ResultListener>,
    notifier: Arc<dyn Notifier>,
    drafts: Arc<dyn DraftDiscard>,
}

impl EvaluationSession {
    pub fn new(
        host: Arc<dyn ResultListener>,
        notifier: Arc<dyn Notifier>,
        drafts: Arc<dyn DraftDiscard>,
    ) -> Self {
        let rubric = RubricConfig::standard();
        Self {
            log: ActionLog::new(),
            projection: LiveScoreProjection::new(rubric.clone()),
            calculator: FinalScoreCalculator::new(rubric),
            advisories: AdvisoryConfig::default(),
            hint_surfaced: false,
            result: None,
            host,
            notifier,
            drafts,
        }
    }

    pub fn with_rubric(mut self, rubric: RubricConfig) -> Self {
        self.projection = LiveScoreProjection::new(rubric.clone());
        self.calculator = FinalScoreCalculator::new(rubric);
        self
    }

    pub fn with_advisories(mut self, advisories: AdvisoryConfig) -> Self {
        self.advisories = advisories;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.result.is_some() {
            SessionState::Finalized
        } else {
            SessionState::Active
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.result.is_some()
    }

    pub fn entries(&self) -> &[ActionEntry] {
        self.log.entries()
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn hint_surfaced(&self) -> bool {
        self.hint_surfaced
    }

    /// Append an action unless the session is finalized. Returns whether it was logged.
    pub fn record(&mut self, action: Action) -> bool {
        let kind = action.kind();
        if self.is_finalized() {
            debug!(kind = kind.label(), "session finalized; action ignored");
            return false;
        }

        self.log.append(action);
        debug!(kind = kind.label(), entries = self.log.len(), "action recorded");

        if matches!(
            kind,
            ActionKind::FormSubmitInvalid | ActionKind::FileUploadInvalid
        ) {
            self.surface_advisory();
        }
        true
    }

    /// Live projection while active, the frozen final score afterwards.
    pub fn current_score(&self) -> u32 {
        self.projection
            .project_or_frozen(&self.log, self.result.as_ref())
    }

    /// Compute, store and emit the final result exactly once; later calls return it unchanged.
    pub fn finalize(&mut self) -> &EvaluationResult {
        let result = match self.result.take() {
            Some(existing) => existing,
            None => {
                let result = self.calculator.calculate(&self.log);
                info!(
                    score = result.score,
                    tasks_completed = result.tasks_completed,
                    entries = self.log.len(),
                    "evaluation finalized"
                );
                let payload = EvaluationResultPayload::from_result(&result, Utc::now());
                if let Err(err) = self.host.emit(payload) {
                    warn!(error = %err, "failed to deliver evaluation result to host");
                }
                result
            }
        };
        self.result.insert(result)
    }

    /// Log a hint request (ignored once finalized) and always show the on-demand hint.
    pub fn request_hint(&mut self) {
        self.record(Action::HintRequest);
        self.deliver(Notification::info(ON_DEMAND_HINT));
    }

    /// Start over: empty log, unfinalized, advisory re-armed, saved draft discarded.
    pub fn reset(&mut self) {
        self.log.clear();
        self.result = None;
        self.hint_surfaced = false;
        if let Err(err) = self.drafts.discard_draft() {
            warn!(error = %err, "failed to discard saved form draft");
        }
        info!("evaluation session reset");
    }

    fn surface_advisory(&mut self) {
        if self.hint_surfaced {
            return;
        }

        let advisory = if self.log.count(ActionKind::FormSubmitInvalid)
            >= self.advisories.invalid_submits_before_hint
        {
            REQUIRED_FIELDS_ADVISORY.to_string()
        } else if self.log.count(ActionKind::FileUploadInvalid)
            >= self.advisories.invalid_files_before_hint
        {
            file_name_advisory()
        } else {
            return;
        };

        self.hint_surfaced = true;
        debug!(%advisory, "automatic advisory surfaced");
        self.deliver(Notification::info(advisory));
    }

    fn deliver(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(notification) {
            warn!(error = %err, "failed to surface notification");
        }
    }
}

pub fn file_name_advisory() -> String {
    let names = ACCEPTED_DOCUMENT_NAMES
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>();
    format!("Hint: the file name must be one of {}.", names.join(", "))
}
