//! Analysis Gateway Tests
//!
//! Remote-first analysis, fallback on failure, and the session-wide latch.

use crate::actors::gateway::AnalysisGateway;
use crate::actors::messages::AppError;
use crate::models::{SOURCE_FALLBACK, SOURCE_FALLBACK_UNCERTAIN};
use crate::session::SessionState;
use crate::tests::mocks::{remote_result, MockBackend};
use std::sync::Arc;

#[cfg(test)]
mod gateway_tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_result_is_passed_through() {
        let backend = Arc::new(MockBackend::answering(remote_result(Some(false), 72.5)));
        let session = SessionState::new();
        let gateway = AnalysisGateway::new(backend.clone(), session.clone());

        let result = gateway.analyze("NASA confirms rover landing").await;

        assert_eq!(result.source, "ml_model");
        assert_eq!(result.confidence, 72.5);
        assert_eq!(backend.analyze_count(), 1);
        assert!(session.backend_available());
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_and_latches() {
        let backend = Arc::new(MockBackend::unreachable());
        let session = SessionState::new();
        let gateway = AnalysisGateway::new(backend.clone(), session.clone());

        let result = gateway.analyze("Make $10000 weekly income from home!!!").await;

        assert_eq!(result.source, SOURCE_FALLBACK);
        assert_eq!(result.is_fake, Some(true));
        assert!(!session.backend_available());
    }

    #[tokio::test]
    async fn test_backend_status_error_is_treated_like_network_failure() {
        let backend = Arc::new(MockBackend::failing(AppError::Backend {
            status: 503,
            body: "Service Unavailable".to_string(),
        }));
        let session = SessionState::new();
        let gateway = AnalysisGateway::new(backend, session.clone());

        let result = gateway.analyze("The weather is nice").await;

        assert_eq!(result.source, SOURCE_FALLBACK_UNCERTAIN);
        assert_eq!(result.is_fake, None);
        assert!(!session.backend_available());
    }

    #[tokio::test]
    async fn test_latch_skips_network_for_rest_of_session() {
        let backend = Arc::new(MockBackend::unreachable());
        let session = SessionState::new();
        let gateway = AnalysisGateway::new(backend.clone(), session.clone());

        gateway.analyze("first").await;
        assert_eq!(backend.analyze_count(), 1);

        // Even once the backend would answer again, it is never asked.
        backend.recover(remote_result(Some(false), 99.0));
        for text in ["second", "third", "According to experts it is fine"] {
            let result = gateway.analyze(text).await;
            assert!(result.is_fallback());
        }
        assert_eq!(backend.analyze_count(), 1);
    }

    #[tokio::test]
    async fn test_offline_session_never_calls_backend() {
        let backend = Arc::new(MockBackend::answering(remote_result(Some(true), 90.0)));
        let gateway = AnalysisGateway::new(backend.clone(), SessionState::offline());

        let result = gateway.analyze("chemtrails").await;

        assert_eq!(result.source, SOURCE_FALLBACK);
        assert_eq!(backend.analyze_count(), 0);
    }

    #[tokio::test]
    async fn test_latch_is_shared_between_gateways() {
        let backend = Arc::new(MockBackend::unreachable());
        let session = SessionState::new();
        let first = AnalysisGateway::new(backend.clone(), session.clone());
        let second = AnalysisGateway::new(backend.clone(), session.clone());

        first.analyze("trip it").await;
        second.analyze("should not hit network").await;

        assert_eq!(backend.analyze_count(), 1);
    }
}
