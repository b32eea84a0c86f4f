use crate::actors::messages::BestEffort;
use crate::actors::traits::ChatBackend;
use crate::models::{Message, StoredMessage};
use crate::session::SessionState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const WELCOME_MESSAGE: &str = "🔍 Hello! I'm an AI assistant for news verification. Send me a news story, and I'll analyze its reliability.";

/// Best-effort mirror of the conversation in the backend.
///
/// Nothing here ever fails the caller and nothing here trips the session latch.
pub struct ConversationStore<B: ChatBackend> {
    backend: Arc<B>,
    session: SessionState,
}

impl<B: ChatBackend> Clone for ConversationStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            session: self.session.clone(),
        }
    }
}

impl<B: ChatBackend> ConversationStore<B> {
    pub fn new(backend: Arc<B>, session: SessionState) -> Self {
        Self { backend, session }
    }

    /// Saves one message and waits for the outcome.
    #[allow(dead_code)]
    pub async fn save(&self, content: &str, is_user: bool) -> BestEffort {
        if !self.session.backend_available() {
            return BestEffort::Skipped;
        }
        self.persist(content, is_user).await
    }

    /// Starts a save in its own task and returns at once.
    ///
    /// Availability is checked now, so a latch tripped after this call does not
    /// cancel a save that was already due.
    pub fn save_detached(&self, content: impl Into<String>, is_user: bool) -> JoinHandle<BestEffort> {
        let available = self.session.backend_available();
        let store = self.clone();
        let content = content.into();
        tokio::spawn(async move {
            if !available {
                return BestEffort::Skipped;
            }
            store.persist(&content, is_user).await
        })
    }

    async fn persist(&self, content: &str, is_user: bool) -> BestEffort {
        match self
            .backend
            .save_message(&StoredMessage::new(content, is_user))
            .await
        {
            Ok(()) => BestEffort::Done,
            Err(e) => {
                warn!("Message save failed, continuing without save: {}", e);
                BestEffort::Failed(e)
            }
        }
    }

    /// The stored conversation, or a single welcome message when there is none.
    pub async fn load_history(&self) -> Vec<Message> {
        if !self.session.backend_available() {
            return vec![welcome_message()];
        }
        match self.backend.fetch_messages().await {
            Ok(stored) if stored.is_empty() => vec![welcome_message()],
            Ok(stored) => {
                debug!("Loaded {} messages from history", stored.len());
                stored.into_iter().map(Message::from_history).collect()
            }
            Err(e) => {
                warn!("History fetch failed, showing welcome message: {}", e);
                vec![welcome_message()]
            }
        }
    }
}

pub fn welcome_message() -> Message {
    Message::bot(WELCOME_MESSAGE)
}
