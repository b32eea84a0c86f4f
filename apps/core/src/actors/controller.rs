use crate::actors::feedback::{FeedbackAction, FeedbackCollector, FeedbackControls, FeedbackOutcome};
use crate::actors::gateway::AnalysisGateway;
use crate::actors::messages::{ActorError, AppError, ControllerMessage, TurnOutcome, TurnState};
use crate::actors::store::ConversationStore;
use crate::actors::traits::ChatBackend;
use crate::models::{Message, RetrainReport, TrainingEntry};
use crate::session::SessionState;
use crate::view::ChatView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

pub const ANALYSIS_ERROR_REPLY: &str =
    "Sorry, an error occurred while analyzing the message. Please try again.";

/// How many reply controls are kept for feedback routing. Resolved ones go first.
pub const MAX_TRACKED_CONTROLS: usize = 64;

/// A handle to the chat controller.
///
/// This is the entry point for everything the user does. Requests are queued in the
/// controller's mailbox and processed one at a time, so overlapping sends never interleave.
#[derive(Clone)]
pub struct ChatControllerHandle {
    sender: mpsc::Sender<ControllerMessage>,
}

impl ChatControllerHandle {
    /// Spawns the controller in a new Tokio task and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `backend` - The remote backend, shared by gateway, store and feedback collector.
    /// * `view` - Where the conversation is rendered.
    /// * `session` - The session latch. Pass `SessionState::offline()` for heuristic-only mode.
    /// * `typing_delay` - Fixed delay while the typing indicator is shown.
    pub fn spawn<B, V>(backend: Arc<B>, view: V, session: SessionState, typing_delay: Duration) -> Self
    where
        B: ChatBackend,
        V: ChatView,
    {
        let (sender, receiver) = mpsc::channel(32);
        let runner = ControllerRunner::new(receiver, backend, view, session, typing_delay);
        tokio::spawn(async move { runner.run().await });
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, AppError>>) -> ControllerMessage,
    ) -> Result<T, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(build(send))
            .await
            .map_err(|e| AppError::Actor(ActorError::MailboxClosed(e.to_string())))?;
        recv.await
            .map_err(|e| AppError::Actor(ActorError::NoResponse(e.to_string())))?
    }

    /// Renders the stored conversation (or the welcome message). Returns how many
    /// messages were shown.
    pub async fn load_history(&self) -> Result<usize, AppError> {
        self.request(|responder| ControllerMessage::LoadHistory { responder })
            .await
    }

    /// Runs one full user turn.
    #[instrument(skip(self, text))]
    pub async fn submit(&self, text: String) -> Result<TurnOutcome, AppError> {
        self.request(|responder| ControllerMessage::Submit { text, responder })
            .await
    }

    /// Applies a feedback action. `target` is a prefix of the reply id.
    pub async fn feedback(
        &self,
        target: Option<String>,
        action: FeedbackAction,
    ) -> Result<FeedbackOutcome, AppError> {
        self.request(|responder| ControllerMessage::Feedback {
            target,
            action,
            responder,
        })
        .await
    }

    pub async fn list_training(&self) -> Result<Vec<TrainingEntry>, AppError> {
        self.request(|responder| ControllerMessage::ListTraining { responder })
            .await
    }

    pub async fn forget_training(&self, id: i64) -> Result<(), AppError> {
        self.request(|responder| ControllerMessage::ForgetTraining { id, responder })
            .await
    }

    pub async fn retrain(&self) -> Result<RetrainReport, AppError> {
        self.request(|responder| ControllerMessage::Retrain { responder })
            .await
    }

    /// Stops the controller after the requests already queued.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(ControllerMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(ActorError::MailboxClosed(e.to_string())))
    }
}

// --- Actor Runner ---
struct ControllerRunner<B: ChatBackend, V: ChatView> {
    receiver: mpsc::Receiver<ControllerMessage>,
    backend: Arc<B>,
    gateway: AnalysisGateway<B>,
    store: ConversationStore<B>,
    collector: FeedbackCollector<B>,
    session: SessionState,
    view: V,
    typing_delay: Duration,
    /// Controls of recent classified replies, oldest first.
    controls: Vec<FeedbackControls>,
    state: TurnState,
}

impl<B: ChatBackend, V: ChatView> ControllerRunner<B, V> {
    fn new(
        receiver: mpsc::Receiver<ControllerMessage>,
        backend: Arc<B>,
        view: V,
        session: SessionState,
        typing_delay: Duration,
    ) -> Self {
        Self {
            receiver,
            gateway: AnalysisGateway::new(backend.clone(), session.clone()),
            store: ConversationStore::new(backend.clone(), session.clone()),
            collector: FeedbackCollector::new(backend.clone(), session.clone()),
            backend,
            session,
            view,
            typing_delay,
            controls: Vec::new(),
            state: TurnState::Idle,
        }
    }

    async fn run(mut self) {
        info!("Chat controller started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, ControllerMessage::Shutdown) {
                info!("Chat controller shutting down...");
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Chat controller stopped");
    }

    async fn handle_message(&mut self, msg: ControllerMessage) {
        match msg {
            ControllerMessage::LoadHistory { responder } => {
                let result = self.handle_load_history().await;
                let _ = responder.send(result);
            }
            ControllerMessage::Submit { text, responder } => {
                let result = self.handle_submit(&text).await;
                self.set_state(TurnState::Idle);
                if let Err(e) = &result {
                    error!("Error processing user message: {:?}", e);
                }
                let _ = responder.send(result);
            }
            ControllerMessage::Feedback {
                target,
                action,
                responder,
            } => {
                let result = self.handle_feedback(target.as_deref(), action).await;
                let _ = responder.send(result);
            }
            ControllerMessage::ListTraining { responder } => {
                let result = match self.backend.list_training_data().await {
                    Ok(entries) => self.view.render_training(&entries).map(|_| entries),
                    Err(e) => Err(e),
                };
                let _ = responder.send(self.report_console_error(result));
            }
            ControllerMessage::ForgetTraining { id, responder } => {
                let result = match self.backend.delete_training_data(id).await {
                    Ok(()) => self
                        .view
                        .render_notice(&format!("Training sample #{} deleted.", id)),
                    Err(e) => Err(e),
                };
                let _ = responder.send(self.report_console_error(result));
            }
            ControllerMessage::Retrain { responder } => {
                let result = match self.backend.retrain().await {
                    Ok(report) => self.view.render_retrain(&report).map(|_| report),
                    Err(e) => Err(e),
                };
                let _ = responder.send(self.report_console_error(result));
            }
            ControllerMessage::Shutdown => {}
        }
    }

    fn set_state(&mut self, state: TurnState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Turn state");
            self.state = state;
            self.view.turn_state_changed(state);
        }
    }

    async fn handle_load_history(&mut self) -> Result<usize, AppError> {
        let history = self.store.load_history().await;
        for message in &history {
            self.view.render_message(message)?;
        }
        Ok(history.len())
    }

    #[instrument(skip(self, text))]
    async fn handle_submit(&mut self, text: &str) -> Result<TurnOutcome, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message is empty".to_string()));
        }

        // --- Sending ---
        self.set_state(TurnState::Sending);
        let user_message = Message::user(text);
        self.view.render_message(&user_message)?;
        let _ = self.store.save_detached(text, true);

        // --- Typing indicator ---
        self.set_state(TurnState::TypingIndicatorShown);
        self.view.show_typing()?;
        tokio::time::sleep(self.typing_delay).await;

        // --- Analysis ---
        let analysis = self.gateway.analyze(text).await;
        self.set_state(TurnState::AnalysisComplete);
        self.view.hide_typing()?;

        // --- Rendering ---
        let reply = Message::from_analysis(&analysis);
        if let Err(e) = self.view.render_message(&reply) {
            error!("Failed to render analysis: {}", e);
            let _ = self.view.render_message(&Message::bot(ANALYSIS_ERROR_REPLY));
            return Err(e);
        }

        let controls = FeedbackControls::attach(reply.id, text, &analysis, &self.session);
        let feedback_enabled = controls.is_some();
        if let Some(controls) = controls {
            if let Err(e) = self.view.render_feedback_controls(&controls) {
                warn!("Failed to render feedback controls: {}", e);
            }
            self.track_controls(controls);
        }

        let _ = self.store.save_detached(analysis.result.clone(), false);
        self.set_state(TurnState::Rendered);

        Ok(TurnOutcome {
            user_message,
            reply,
            analysis,
            feedback_enabled,
        })
    }

    async fn handle_feedback(
        &mut self,
        target: Option<&str>,
        action: FeedbackAction,
    ) -> Result<FeedbackOutcome, AppError> {
        let index = match self.find_controls(target) {
            Some(index) => index,
            None => {
                let e = match target {
                    None => AppError::Validation("No open feedback controls".to_string()),
                    Some(prefix) => {
                        AppError::Validation(format!("No feedback controls for '{}'", prefix))
                    }
                };
                let _ = self.view.render_notice(&e.to_string());
                return Err(e);
            }
        };

        match self.collector.dispatch(&mut self.controls[index], action).await {
            Ok(outcome) => {
                self.view.render_feedback_outcome(&outcome)?;
                Ok(outcome)
            }
            Err(e) => {
                let _ = self.view.render_notice(&e.to_string());
                Err(e)
            }
        }
    }

    fn find_controls(&self, target: Option<&str>) -> Option<usize> {
        match target {
            None => self.controls.iter().rposition(FeedbackControls::is_open),
            Some(prefix) => {
                let prefix = prefix.to_ascii_lowercase();
                self.controls.iter().rposition(|c| {
                    c.message_id.simple().to_string().starts_with(&prefix)
                        || c.message_id.to_string().starts_with(&prefix)
                })
            }
        }
    }

    fn track_controls(&mut self, controls: FeedbackControls) {
        self.controls.push(controls);
        if self.controls.len() > MAX_TRACKED_CONTROLS {
            self.controls.retain(FeedbackControls::is_open);
        }
        if self.controls.len() > MAX_TRACKED_CONTROLS {
            let excess = self.controls.len() - MAX_TRACKED_CONTROLS;
            self.controls.drain(..excess);
        }
    }

    fn report_console_error<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            error!("Training console request failed: {}", e);
            let _ = self.view.render_notice(&format!("Training console error: {}", e));
        }
        result
    }
}
