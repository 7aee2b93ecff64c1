use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::{SessionId, Transcript};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid transcript at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Persistence for conversation transcripts, keyed by session id.
///
/// Also remembers which session was active last so a widget can resume it.
pub trait SessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<Transcript>, StoreError>;
    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<(), StoreError>;
    fn current_session(&self) -> Result<Option<SessionId>, StoreError>;
    fn set_current_session(&self, id: &SessionId) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn load(&self, id: &SessionId) -> Result<Option<Transcript>, StoreError> {
        (**self).load(id)
    }

    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<(), StoreError> {
        (**self).save(id, transcript)
    }

    fn current_session(&self) -> Result<Option<SessionId>, StoreError> {
        (**self).current_session()
    }

    fn set_current_session(&self, id: &SessionId) -> Result<(), StoreError> {
        (**self).set_current_session(id)
    }
}

/// In-memory store, for tests and sessions that need not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    transcripts: HashMap<SessionId, Transcript>,
    current: Option<SessionId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, id: &SessionId) -> Result<Option<Transcript>, StoreError> {
        let state = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(state.transcripts.get(id).cloned())
    }

    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<(), StoreError> {
        let mut state = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        state.transcripts.insert(id.clone(), transcript.clone());
        Ok(())
    }

    fn current_session(&self) -> Result<Option<SessionId>, StoreError> {
        let state = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(state.current.clone())
    }

    fn set_current_session(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut state = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        state.current = Some(id.clone());
        Ok(())
    }
}
