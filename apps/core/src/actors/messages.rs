use serde::Serialize;
use tokio::sync::oneshot;

use crate::actors::feedback::{FeedbackAction, FeedbackOutcome};
use crate::models::{AnalysisResult, Message, RetrainReport, TrainingEntry};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The controller's mailbox is closed; the actor has stopped.
    #[error("Mailbox closed: {0}")]
    MailboxClosed(String),
    /// The actor dropped the responder without answering.
    #[error("No response from actor: {0}")]
    NoResponse(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Outcome of a call whose failure the caller is allowed to ignore.
///
/// Not `#[must_use]`; callers are free to drop it.
#[derive(Debug, Clone)]
pub enum BestEffort {
    /// The backend acknowledged the call.
    Done,
    /// The call was not attempted because the backend is unavailable.
    Skipped,
    /// The call was attempted and failed; the error has already been logged.
    Failed(AppError),
}

/// Where a user turn currently is. A turn always ends back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TurnState {
    Idle,
    Sending,
    TypingIndicatorShown,
    AnalysisComplete,
    Rendered,
}

/// Everything produced by one completed user turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub reply: Message,
    pub analysis: AnalysisResult,
    /// Whether feedback controls were attached to the reply.
    pub feedback_enabled: bool,
}

/// Messages that can be sent to the chat controller.
#[derive(Debug)]
pub enum ControllerMessage {
    /// Render the stored conversation, or the welcome message.
    LoadHistory {
        /// Number of messages rendered.
        responder: oneshot::Sender<Result<usize, AppError>>,
    },
    /// A user message to analyze.
    Submit {
        text: String,
        responder: oneshot::Sender<Result<TurnOutcome, AppError>>,
    },
    /// A feedback action on a bot reply.
    Feedback {
        /// Prefix of the reply's id; `None` targets the newest open controls.
        target: Option<String>,
        action: FeedbackAction,
        responder: oneshot::Sender<Result<FeedbackOutcome, AppError>>,
    },
    /// List stored training samples.
    ListTraining {
        responder: oneshot::Sender<Result<Vec<TrainingEntry>, AppError>>,
    },
    /// Delete one training sample.
    ForgetTraining {
        id: i64,
        responder: oneshot::Sender<Result<(), AppError>>,
    },
    /// Ask the backend to rebuild its model from the training set.
    Retrain {
        responder: oneshot::Sender<Result<RetrainReport, AppError>>,
    },
    /// A command to stop the controller.
    Shutdown,
}
