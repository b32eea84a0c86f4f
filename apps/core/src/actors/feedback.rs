use crate::actors::messages::AppError;
use crate::actors::traits::ChatBackend;
use crate::models::{AnalysisResult, FeedbackRecord, TrainingSample};
use crate::session::SessionState;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

pub const ACK_CONFIRMED: &str = "✓ Thanks for your feedback!";
pub const ACK_DENIED: &str = "✓ Noted - analysis was incorrect";
pub const ACK_TRAINING: &str = "✓ Added to training data!";
pub const ERR_FEEDBACK: &str = "✗ Error sending feedback";
pub const ERR_TRAINING: &str = "✗ Error adding to training";

/// The three controls attached to a classified reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAction {
    /// The verdict was correct.
    Confirm,
    /// The verdict was wrong.
    Deny,
    /// Submit the user's text as a training sample with the given verdict.
    AddTraining,
}

impl FromStr for FeedbackAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "confirm" => Ok(FeedbackAction::Confirm),
            "no" | "n" | "deny" => Ok(FeedbackAction::Deny),
            "train" | "t" => Ok(FeedbackAction::AddTraining),
            other => Err(AppError::Validation(format!(
                "Unknown feedback action '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlsState {
    Open,
    /// A request is in flight; the controls are disabled.
    Disabled,
    /// Replaced by an acknowledgment or error text. Terminal.
    Resolved(String),
}

/// Feedback controls for one bot reply.
#[derive(Debug, Clone)]
pub struct FeedbackControls {
    pub message_id: Uuid,
    pub user_message: String,
    pub bot_response: String,
    pub is_fake: bool,
    pub confidence: f64,
    state: ControlsState,
}

impl FeedbackControls {
    /// Controls are only offered for a decided verdict while the backend is reachable.
    pub fn attach(
        message_id: Uuid,
        user_message: &str,
        analysis: &AnalysisResult,
        session: &SessionState,
    ) -> Option<Self> {
        let is_fake = analysis.is_fake?;
        if !session.backend_available() {
            return None;
        }
        Some(Self {
            message_id,
            user_message: user_message.to_string(),
            bot_response: analysis.result.clone(),
            is_fake,
            confidence: analysis.confidence,
            state: ControlsState::Open,
        })
    }

    pub fn state(&self) -> &ControlsState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ControlsState::Open
    }
}

/// What replaced the controls after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackOutcome {
    pub message_id: Uuid,
    pub text: String,
    /// Whether the backend accepted the submission.
    pub delivered: bool,
}

/// Posts feedback and training samples for a set of controls.
pub struct FeedbackCollector<B: ChatBackend> {
    backend: Arc<B>,
    session: SessionState,
}

impl<B: ChatBackend> FeedbackCollector<B> {
    pub fn new(backend: Arc<B>, session: SessionState) -> Self {
        Self { backend, session }
    }

    /// Runs one action. Every completed action resolves the controls for good, even
    /// when the submission failed; there is no retry.
    #[instrument(skip(self, controls), fields(message_id = %controls.message_id))]
    pub async fn dispatch(
        &self,
        controls: &mut FeedbackControls,
        action: FeedbackAction,
    ) -> Result<FeedbackOutcome, AppError> {
        if !controls.is_open() {
            return Err(AppError::FeedbackClosed);
        }
        if !self.session.backend_available() {
            return Err(AppError::BackendUnavailable);
        }

        controls.state = ControlsState::Disabled;
        let (result, ack, failure) = match action {
            FeedbackAction::Confirm => (self.send_feedback(controls, true).await, ACK_CONFIRMED, ERR_FEEDBACK),
            FeedbackAction::Deny => (self.send_feedback(controls, false).await, ACK_DENIED, ERR_FEEDBACK),
            FeedbackAction::AddTraining => {
                let sample = TrainingSample::from_user(controls.user_message.clone(), controls.is_fake);
                (self.backend.add_training_sample(&sample).await, ACK_TRAINING, ERR_TRAINING)
            }
        };

        let (text, delivered) = match result {
            Ok(()) => {
                info!(?action, "Feedback delivered");
                (ack, true)
            }
            Err(e) => {
                error!(?action, "Error sending feedback: {}", e);
                (failure, false)
            }
        };
        controls.state = ControlsState::Resolved(text.to_string());

        Ok(FeedbackOutcome {
            message_id: controls.message_id,
            text: text.to_string(),
            delivered,
        })
    }

    async fn send_feedback(&self, controls: &FeedbackControls, correct: bool) -> Result<(), AppError> {
        let record = FeedbackRecord {
            user_message: controls.user_message.clone(),
            bot_response: controls.bot_response.clone(),
            is_fake: controls.is_fake,
            confidence: controls.confidence,
            user_feedback: correct,
        };
        self.backend.send_feedback(&record).await
    }
}
