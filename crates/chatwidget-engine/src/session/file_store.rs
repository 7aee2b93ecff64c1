use std::fs;
use std::path::{Path, PathBuf};

use super::{SessionId, SessionStore, StoreError, Transcript};

const CURRENT_SESSION_FILE: &str = "current_session";

/// Stores each transcript as `messages_<session id>.json` under a directory.
///
/// The id of the last active session lives in a `current_session` file next
/// to the transcripts.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn transcript_path(&self, id: &SessionId) -> Result<PathBuf, StoreError> {
        if !id.is_path_safe() {
            return Err(StoreError::InvalidSessionId(id.to_string()));
        }
        Ok(self.root.join(format!("messages_{id}.json")))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        // Create the store directory if it doesn't exist yet
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;
        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reads a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl SessionStore for FileStore {
    fn load(&self, id: &SessionId) -> Result<Option<Transcript>, StoreError> {
        let path = self.transcript_path(id)?;
        let Some(content) = read_optional(&path)? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<(), StoreError> {
        let path = self.transcript_path(id)?;
        let content = serde_json::to_string(transcript).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write(&path, &content)?;
        log::debug!("Saved {} messages to {}", transcript.len(), path.display());
        Ok(())
    }

    fn current_session(&self) -> Result<Option<SessionId>, StoreError> {
        let path = self.root.join(CURRENT_SESSION_FILE);
        let id = read_optional(&path)?
            .map(|content| content.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(SessionId::new);
        Ok(id)
    }

    fn set_current_session(&self, id: &SessionId) -> Result<(), StoreError> {
        if !id.is_path_safe() {
            return Err(StoreError::InvalidSessionId(id.to_string()));
        }
        self.write(&self.root.join(CURRENT_SESSION_FILE), id.as_str())
    }
}
