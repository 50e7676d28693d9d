use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use super::form::AppointmentDraft;
use crate::evaluation::DraftDiscard;

pub const FORM_STORAGE_KEY: &str = "appointment-form-data";
pub const APPOINTMENTS_STORAGE_KEY: &str = "medical-appointments";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored value under '{key}' is unreadable")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key/value persistence, shaped like browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Persists the in-progress form so a reload picks up where the user left off.
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, draft: &AppointmentDraft) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(draft)?;
        self.store.set(FORM_STORAGE_KEY, encoded)
    }

    /// Saved draft, or a blank one. An unreadable draft is dropped from storage.
    pub fn load(&self) -> Result<AppointmentDraft, StorageError> {
        let Some(raw) = self.store.get(FORM_STORAGE_KEY)? else {
            return Ok(AppointmentDraft::default());
        };

        match serde_json::from_str(&raw) {
            Ok(draft) => Ok(draft),
            Err(source) => {
                let err = StorageError::Corrupt {
                    key: FORM_STORAGE_KEY.to_string(),
                    source,
                };
                warn!(error = %err, "discarding unreadable form draft");
                self.store.remove(FORM_STORAGE_KEY)?;
                Ok(AppointmentDraft::default())
            }
        }
    }

    pub fn discard(&self) -> Result<(), StorageError> {
        self.store.remove(FORM_STORAGE_KEY)
    }
}

impl DraftDiscard for DraftStore {
    fn discard_draft(&self) -> Result<(), StorageError> {
        self.discard()
    }
}
