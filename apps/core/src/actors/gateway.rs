use crate::actors::traits::ChatBackend;
use crate::brain::HeuristicClassifier;
use crate::models::AnalysisResult;
use crate::session::SessionState;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Remote classification with a local fallback.
///
/// Issues at most one request per call. The first failure trips the session latch,
/// after which every call goes straight to the heuristic classifier.
pub struct AnalysisGateway<B: ChatBackend> {
    backend: Arc<B>,
    session: SessionState,
    classifier: HeuristicClassifier,
}

impl<B: ChatBackend> AnalysisGateway<B> {
    pub fn new(backend: Arc<B>, session: SessionState) -> Self {
        Self {
            backend,
            session,
            classifier: HeuristicClassifier::new(),
        }
    }

    /// Always yields a result; backend problems are absorbed here.
    #[instrument(skip(self, text))]
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        if !self.session.backend_available() {
            info!("Backend unavailable, using fallback analysis");
            return self.classifier.classify(text);
        }

        match self.backend.analyze(text).await {
            Ok(result) => result,
            Err(e) => {
                if e.disables_backend() {
                    warn!("Backend analysis failed, using fallback: {}", e);
                } else {
                    error!("Unexpected analysis error, using fallback: {}", e);
                }
                self.session.mark_backend_unavailable(&e.to_string());
                self.classifier.classify(text)
            }
        }
    }
}
