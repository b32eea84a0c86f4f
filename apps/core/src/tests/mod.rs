//! Test Module
//!
//! Test suite for the Veritas chat client.
//!
//! ## Test Categories
//! - `mocks`: in-memory backend and recording view
//! - `heuristic_tests`: fallback classifier scoring and verdicts
//! - `gateway_tests`: remote analysis, fallback and the session latch
//! - `feedback_tests`: feedback actions and their terminal state
//! - `controller_tests`: turn orchestration, history, queuing
//! - `integration_tests`: full workflows against a mock HTTP server

pub mod gateway_tests;
pub mod integration_tests;
