//! Conversation flow of the chat widget, independent of any UI.

use crate::session::{ChatMessage, SessionId, SessionStore, StoreError, Transcript};
use crate::webhook::{Assistant, WebhookError, WebhookRequest};

/// Per-widget settings: language sent to the backend and the canned texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptions {
    pub language: String,
    /// Value of `context.source` in every webhook payload.
    pub source: String,
    pub welcome: String,
    /// Shown when the backend answers without any reply text.
    pub error_message: String,
    /// Shown when the backend cannot be reached or fails.
    pub connection_error: String,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            source: "chat_widget".to_string(),
            welcome: "Hello! How can I help you today?".to_string(),
            error_message: "Sorry, I could not process your request.".to_string(),
            connection_error: "Sorry, I am having trouble connecting right now. Please try again later."
                .to_string(),
        }
    }
}

/// A conversation bound to a session store and an assistant backend.
pub struct ChatSession<S, A> {
    store: S,
    assistant: A,
    options: ChatOptions,
    session_id: SessionId,
    transcript: Transcript,
}

impl<S: SessionStore, A: Assistant> ChatSession<S, A> {
    /// Resumes the store's current session, or starts and records a new one.
    ///
    /// A resumed session without a stored transcript starts from the welcome message.
    pub fn open(store: S, assistant: A, options: ChatOptions) -> Result<Self, StoreError> {
        let (session_id, transcript) = match store.current_session()? {
            Some(id) => {
                let transcript = store
                    .load(&id)?
                    .unwrap_or_else(|| Transcript::welcome(&options.welcome));
                log::debug!("Resumed session {id} with {} messages", transcript.len());
                (id, transcript)
            }
            None => {
                let id = SessionId::generate();
                store.set_current_session(&id)?;
                log::debug!("Started session {id}");
                (id, Transcript::welcome(&options.welcome))
            }
        };

        Ok(Self {
            store,
            assistant,
            options,
            session_id,
            transcript,
        })
    }

    /// Sends a user message and records the assistant's answer.
    ///
    /// Blank input is ignored and returns `Ok(None)`. Backend failures never
    /// surface as errors: they become the configured fallback bot message.
    pub fn send(&mut self, input: &str) -> Result<Option<&ChatMessage>, StoreError> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        self.transcript.push(ChatMessage::user(input));

        let request = WebhookRequest::new(
            input,
            &self.session_id,
            &self.options.language,
            &self.options.source,
        );
        let reply = match self.assistant.ask(&request) {
            Ok(text) => text,
            Err(WebhookError::EmptyReply) => {
                log::warn!("Assistant returned no reply text");
                self.options.error_message.clone()
            }
            Err(e) => {
                log::warn!("Error sending message to assistant: {e}");
                self.options.connection_error.clone()
            }
        };

        self.transcript.push(ChatMessage::bot(reply));
        self.store.save(&self.session_id, &self.transcript)?;
        Ok(self.transcript.last())
    }

    /// Switches to a fresh session id with only the welcome message.
    pub fn start_new_conversation(&mut self) -> Result<(), StoreError> {
        let id = SessionId::generate();
        self.store.set_current_session(&id)?;
        self.session_id = id;
        self.transcript = Transcript::welcome(&self.options.welcome);
        self.store.save(&self.session_id, &self.transcript)?;
        log::debug!("Started new conversation {}", self.session_id);
        Ok(())
    }

    /// Changes the language sent to the backend.
    ///
    /// If the conversation has not started yet, the welcome message is
    /// replaced by `welcome` and saved.
    pub fn set_language(&mut self, language: &str, welcome: &str) -> Result<(), StoreError> {
        self.options.language = language.to_string();
        self.options.welcome = welcome.to_string();

        if self.transcript.is_only_welcome() {
            self.transcript = Transcript::welcome(welcome);
            self.store.save(&self.session_id, &self.transcript)?;
        }
        Ok(())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn language(&self) -> &str {
        &self.options.language
    }

    pub fn options(&self) -> &ChatOptions {
        &self.options
    }
}
