use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::booking::StorageError;
use crate::evaluation::host::{
    DraftDiscard, EvaluationResultPayload, ListenerError, Notification, Notifier, NotifyError,
    ResultListener,
};
use crate::evaluation::{Action, ActionLog, EvaluationSession};

#[derive(Default)]
pub(super) struct MemoryHost {
    payloads: Mutex<Vec<EvaluationResultPayload>>,
}

impl MemoryHost {
    pub(super) fn payloads(&self) -> Vec<EvaluationResultPayload> {
        self.payloads.lock().expect("host mutex poisoned").clone()
    }
}

impl ResultListener for MemoryHost {
    fn emit(&self, payload: EvaluationResultPayload) -> Result<(), ListenerError> {
        self.payloads
            .lock()
            .expect("host mutex poisoned")
            .push(payload);
        Ok(())
    }
}

pub(super) struct OfflineHost;

impl ResultListener for OfflineHost {
    fn emit(&self, _payload: EvaluationResultPayload) -> Result<(), ListenerError> {
        Err(ListenerError::Unavailable("parent window closed".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub(super) fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.notifications
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct CountingDrafts {
    discarded: AtomicUsize,
}

impl CountingDrafts {
    pub(super) fn discarded(&self) -> usize {
        self.discarded.load(Ordering::SeqCst)
    }
}

impl DraftDiscard for CountingDrafts {
    fn discard_draft(&self) -> Result<(), StorageError> {
        self.discarded.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(super) struct BrokenDrafts;

impl DraftDiscard for BrokenDrafts {
    fn discard_draft(&self) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

pub(super) struct Harness {
    pub(super) session: EvaluationSession,
    pub(super) host: Arc<MemoryHost>,
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) drafts: Arc<CountingDrafts>,
}

pub(super) fn harness() -> Harness {
    let host = Arc::new(MemoryHost::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let drafts = Arc::new(CountingDrafts::default());
    let session = EvaluationSession::new(host.clone(), notifier.clone(), drafts.clone());
    Harness {
        session,
        host,
        notifier,
        drafts,
    }
}

pub(super) fn log_of(actions: Vec<Action>) -> ActionLog {
    let mut log = ActionLog::new();
    for action in actions {
        log.append(action);
    }
    log
}

pub(super) fn invalid_id(id: &str) -> Action {
    Action::InvalidIdAttempt { id: id.to_string() }
}

pub(super) fn invalid_submit() -> Action {
    Action::FormSubmitInvalid {
        fields: vec!["cnp".to_string()],
    }
}

pub(super) fn invalid_file() -> Action {
    Action::FileUploadInvalid {
        file_name: "factura_curent.pdf".to_string(),
        violations: vec!["file name".to_string()],
    }
}

pub(super) fn valid_file() -> Action {
    Action::FileUploadValid {
        file_name: "act de identitate.jpg".to_string(),
    }
}
