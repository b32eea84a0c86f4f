//! # Brain Module
//!
//! Local, network-free analysis for Veritas.
//! Used when the remote classifier cannot be reached.
//!
//! ## Components
//! - `patterns`: weighted phrase lists
//! - `heuristic`: the keyword-counting classifier

pub mod heuristic;
pub mod patterns;

pub use heuristic::{HeuristicClassifier, SignalScores};
