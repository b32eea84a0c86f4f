//! Integration Tests
//!
//! End-to-end workflows through the controller and the real HTTP backend client,
//! against a wiremock server.

use crate::actors::backend::HttpBackend;
use crate::actors::controller::ChatControllerHandle;
use crate::actors::feedback::{FeedbackAction, ACK_CONFIRMED};
use crate::actors::messages::AppError;
use crate::actors::store::WELCOME_MESSAGE;
use crate::config::ChatConfig;
use crate::models::SOURCE_FALLBACK;
use crate::session::SessionState;
use crate::tests::mocks::{RecordingView, ViewEvent};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Test Fixtures
// ============================================================================

fn start_controller(
    base: &str,
    view: RecordingView,
    session: SessionState,
) -> ChatControllerHandle {
    let config = ChatConfig::for_backend(base).expect("valid mock url");
    let backend = Arc::new(HttpBackend::new(config.backend_url.clone()));
    ChatControllerHandle::spawn(backend, view, session, config.typing_delay)
}

/// Waits until `server` has seen `count` requests to `route`, or panics after two seconds.
async fn wait_for_requests(server: &MockServer, route: &str, count: usize) {
    for _ in 0..200 {
        let seen = server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count();
        if seen >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {} requests to {}", count, route);
}

async fn mount_empty_history(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

// ============================================================================
// Workflow Integration Tests
// ============================================================================

#[cfg(test)]
mod full_workflow_tests {
    use super::*;

    #[tokio::test]
    async fn test_online_session_analyze_and_confirm() {
        let server = MockServer::start().await;
        mount_empty_history(&server).await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .and(body_json(json!({ "text": "Drinking coffee cures cancer" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "❌ Likely fake",
                "is_fake": true,
                "confidence": 82.0,
                "source": "ml_model"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "ok" })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/feedback"))
            .and(body_json(json!({
                "user_message": "Drinking coffee cures cancer",
                "bot_response": "❌ Likely fake",
                "is_fake": true,
                "confidence": 82.0,
                "user_feedback": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Feedback saved" })))
            .expect(1)
            .mount(&server)
            .await;

        let view = RecordingView::new();
        let session = SessionState::new();
        let handle = start_controller(&server.uri(), view.clone(), session.clone());

        handle.load_history().await.unwrap();
        let turn = handle
            .submit("Drinking coffee cures cancer".to_string())
            .await
            .unwrap();
        let outcome = handle
            .feedback(None, FeedbackAction::Confirm)
            .await
            .unwrap();

        assert_eq!(view.messages()[0].content, WELCOME_MESSAGE);
        assert_eq!(turn.analysis.source, "ml_model");
        assert!(turn.feedback_enabled);
        assert_eq!(outcome.text, ACK_CONFIRMED);
        assert!(session.backend_available());
        wait_for_requests(&server, "/messages", 3).await;
    }

    #[tokio::test]
    async fn test_server_error_switches_session_to_fallback() {
        let server = MockServer::start().await;
        mount_empty_history(&server).await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&server)
            .await;
        // Only the very first user message is saved; afterwards the session is offline.
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let view = RecordingView::new();
        let session = SessionState::new();
        let handle = start_controller(&server.uri(), view.clone(), session.clone());

        let first = handle
            .submit("Government creating storms with HAARP".to_string())
            .await
            .unwrap();
        let second = handle
            .submit("According to official data and research shows this works".to_string())
            .await
            .unwrap();

        assert_eq!(first.analysis.source, SOURCE_FALLBACK);
        assert_eq!(first.analysis.is_fake, Some(true));
        assert_eq!(second.analysis.is_fake, Some(false));
        assert_eq!(second.analysis.confidence, 90.0);
        assert!(!first.feedback_enabled && !second.feedback_enabled);
        assert!(!session.backend_available());
        // Let the detached save of the first user message land.
        wait_for_requests(&server, "/messages", 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_slow_message_store_does_not_delay_replies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "fine",
                "is_fake": false,
                "confidence": 70,
                "source": "ml_model"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(1000)))
            .mount(&server)
            .await;

        let view = RecordingView::new();
        let handle = start_controller(&server.uri(), view.clone(), SessionState::new());

        let started = std::time::Instant::now();
        let turn = handle.submit("Local team wins the cup".to_string()).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_millis(500), "turn took {:?}", elapsed);
        assert_eq!(turn.analysis.source, "ml_model");
        assert_eq!(view.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_backend_still_chats() {
        let view = RecordingView::new();
        let session = SessionState::new();
        let handle = start_controller("http://127.0.0.1:9", view.clone(), session.clone());

        handle.load_history().await.unwrap();
        let turn = handle.submit("Nothing to see here".to_string()).await.unwrap();

        assert_eq!(view.messages()[0].content, WELCOME_MESSAGE);
        assert_eq!(turn.analysis.is_fake, None);
        assert_eq!(turn.analysis.confidence, 50.0);
        assert!(!session.backend_available());
    }

    #[tokio::test]
    async fn test_slow_backend_is_not_cut_short() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(300))
                    .set_body_json(json!({
                        "result": "fine",
                        "is_fake": false,
                        "confidence": 60,
                        "source": "ml_model"
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let handle = start_controller(&server.uri(), RecordingView::new(), SessionState::new());
        let turn = handle.submit("slow".to_string()).await.unwrap();

        assert_eq!(turn.analysis.source, "ml_model");
    }
}

#[cfg(test)]
mod training_console_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_forget_and_retrain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/training-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 4, "text": "NASA confirms landing", "is_fake": false,
                  "category": "science", "source": "initial", "timestamp": "2024-01-02T03:04:05" },
                { "id": 3, "text": "WHO data on vaccines", "is_fake": false,
                  "category": "health", "source": "initial", "timestamp": null }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/training-data/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Data deleted successfully" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/retrain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Training data updated! Total: 3 examples (Fake: 2, Real: 1)",
                "success": true,
                "stats": { "total": 3, "fake": 2, "real": 1 }
            })))
            .mount(&server)
            .await;

        let view = RecordingView::new();
        let handle = start_controller(&server.uri(), view.clone(), SessionState::new());

        let entries = handle.list_training().await.unwrap();
        handle.forget_training(4).await.unwrap();
        let report = handle.retrain().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 4);
        assert_eq!(report.stats.unwrap().fake, 2);
        let events = view.events();
        assert!(events.contains(&ViewEvent::Training(2)));
        assert!(view
            .notices()
            .iter()
            .any(|n| n == "Training sample #4 deleted."));
        assert!(view.notices().iter().any(|n| n.starts_with("Training data updated!")));
    }

    #[tokio::test]
    async fn test_console_errors_are_reported_without_tripping_latch() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/training-data/77"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let view = RecordingView::new();
        let session = SessionState::new();
        let handle = start_controller(&server.uri(), view.clone(), session.clone());

        let result = handle.forget_training(77).await;

        assert!(matches!(result, Err(AppError::Backend { status: 404, .. })));
        assert!(view
            .notices()
            .iter()
            .any(|n| n.starts_with("Training console error:")));
        assert!(session.backend_available());
    }
}
