//! Wires an [`EvaluationSession`] and a [`BookingService`] into one shared runtime and
//! exposes it over HTTP.

mod router;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::booking::{BookingService, KeyValueStore};
use crate::config::ExerciseConfig;
use crate::evaluation::{EvaluationSession, Notifier, ResultListener};

pub use router::{exercise_router, DocumentUpload};

/// Maps a file name to a media type when the client did not declare one.
pub type MediaTypeGuess = fn(&str) -> Option<String>;

fn no_guess(_file_name: &str) -> Option<String> {
    None
}

/// The single-user exercise: one session plus the form it observes.
pub struct ExerciseRuntime {
    pub session: EvaluationSession,
    pub booking: BookingService,
}

impl ExerciseRuntime {
    pub fn new(
        host: Arc<dyn ResultListener>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KeyValueStore>,
        config: &ExerciseConfig,
    ) -> Self {
        let booking = BookingService::new(store, notifier.clone());
        let session = EvaluationSession::new(host, notifier, booking.drafts())
            .with_advisories(config.advisories);
        Self { session, booking }
    }

    /// Fresh session and blank form.
    pub fn reset(&mut self) {
        self.booking.clear_form();
        self.session.reset();
    }
}

/// Router state: the runtime behind a mutex, plus the media-type fallback.
#[derive(Clone)]
pub struct ExerciseState {
    runtime: Arc<Mutex<ExerciseRuntime>>,
    media_type_guess: MediaTypeGuess,
}

impl ExerciseState {
    pub fn new(runtime: ExerciseRuntime) -> Self {
        Self {
            runtime: Arc::new(Mutex::new(runtime)),
            media_type_guess: no_guess,
        }
    }

    pub fn with_media_type_guess(mut self, guess: MediaTypeGuess) -> Self {
        self.media_type_guess = guess;
        self
    }

    pub fn runtime(&self) -> Arc<Mutex<ExerciseRuntime>> {
        self.runtime.clone()
    }

    fn lock(&self) -> Option<MutexGuard<'_, ExerciseRuntime>> {
        self.runtime.lock().ok()
    }
}
