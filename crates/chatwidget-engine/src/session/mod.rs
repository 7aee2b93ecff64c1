//! # Sessions
//!
//! Conversation history behind an injected [`SessionStore`], replacing the
//! widget's global browser storage.
//!
//! ## Modules
//!
//! - **`message`**: `ChatMessage`, `Sender`, `Transcript`
//! - **`store`**: the `SessionStore` trait, `StoreError` and `MemoryStore`
//! - **`file_store`**: `FileStore`, one JSON transcript file per session

pub mod file_store;
pub mod message;
pub mod store;

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use file_store::FileStore;
pub use message::{ChatMessage, Sender, Transcript};
pub use store::{MemoryStore, SessionStore, StoreError};

/// Identifier of one conversation, e.g. `session_1718000000000_k3j9x0a1b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates `session_<unix millis>_<9 random characters>`.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("session_{millis}_{}", &random[..9]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be embedded in a file name as-is.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_expected_shape() {
        let id = SessionId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
        assert!(id.is_path_safe());
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn path_safety() {
        assert!(SessionId::new("session_1-a").is_path_safe());
        assert!(!SessionId::new("").is_path_safe());
        assert!(!SessionId::new("a/b").is_path_safe());
        assert!(!SessionId::new("..").is_path_safe());
    }
}
