use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::formatting::{Rendered, format_reply};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `welcome`, `user_<millis>` or `bot_<millis>`.
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub const WELCOME_ID: &'static str = "welcome";

    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped("user", text.into(), Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::stamped("bot", text.into(), Sender::Bot)
    }

    pub fn welcome(text: impl Into<String>) -> Self {
        Self {
            id: Self::WELCOME_ID.to_string(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
        }
    }

    pub fn is_welcome(&self) -> bool {
        self.id == Self::WELCOME_ID
    }

    /// Bot text runs through the formatting pipeline; user text is shown as typed.
    pub fn formatted(&self) -> Rendered {
        match self.sender {
            Sender::Bot => format_reply(&self.text),
            Sender::User => Rendered::Raw(self.text.clone()),
        }
    }

    fn stamped(prefix: &str, text: String, sender: Sender) -> Self {
        let timestamp = Utc::now();
        Self {
            id: format!("{prefix}_{}", timestamp.timestamp_millis()),
            text,
            sender,
            timestamp,
        }
    }
}

/// The ordered message history of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript holding only the welcome message.
    pub fn welcome(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::welcome(text)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True when nothing but the welcome message has been exchanged.
    pub fn is_only_welcome(&self) -> bool {
        matches!(self.messages.as_slice(), [only] if only.is_welcome())
    }
}
