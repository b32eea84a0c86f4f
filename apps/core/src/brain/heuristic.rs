//! Heuristic reliability classifier.
//!
//! Scores free text against weighted phrase lists. Used whenever the remote
//! classifier is unreachable. Pure function of its input: no state is carried
//! between calls.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::patterns::{
    CREDIBILITY_SIGNALS, CREDIBILITY_WEIGHT, DOLLAR_AMOUNT_WEIGHT, HIGH_FAKE_SIGNALS, HIGH_WEIGHT,
    MEDIUM_FAKE_SIGNALS, MEDIUM_WEIGHT, URGENCY_MARKERS, URGENCY_WEIGHT,
};
use crate::models::{AnalysisResult, SOURCE_FALLBACK, SOURCE_FALLBACK_UNCERTAIN};

/// Score at which either side wins.
const DECISION_THRESHOLD: u32 = 3;
const BASE_CONFIDENCE: u32 = 60;
const CONFIDENCE_PER_POINT: u32 = 5;
const MAX_CONFIDENCE: u32 = 95;
const UNCERTAIN_CONFIDENCE: u32 = 50;

static DOLLAR_AMOUNT: OnceLock<Regex> = OnceLock::new();

fn dollar_amount() -> &'static Regex {
    DOLLAR_AMOUNT.get_or_init(|| Regex::new(r"\$[0-9]+").expect("valid dollar regex"))
}

/// Raw scores accumulated for one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalScores {
    pub fake: u32,
    pub real: u32,
}

/// Keyword-counting classifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Count weighted phrase matches in `text`.
    pub fn score(&self, text: &str) -> SignalScores {
        let lower = text.to_lowercase();

        let mut fake = weighted_matches(&lower, HIGH_FAKE_SIGNALS, HIGH_WEIGHT)
            + weighted_matches(&lower, MEDIUM_FAKE_SIGNALS, MEDIUM_WEIGHT);
        let real = weighted_matches(&lower, CREDIBILITY_SIGNALS, CREDIBILITY_WEIGHT);

        if dollar_amount().is_match(text) {
            fake += DOLLAR_AMOUNT_WEIGHT;
        }
        if URGENCY_MARKERS.iter().any(|marker| text.contains(marker)) {
            fake += URGENCY_WEIGHT;
        }

        SignalScores { fake, real }
    }

    /// Classify `text`. Fake signals take precedence over credibility signals.
    pub fn classify(&self, text: &str) -> AnalysisResult {
        let scores = self.score(text);
        debug!(fake = scores.fake, real = scores.real, "Heuristic scores");

        if scores.fake >= DECISION_THRESHOLD {
            let confidence = confidence_for(scores.fake);
            AnalysisResult {
                result: format!(
                    "⚠️ This appears to be unreliable information (confidence: {}%). Common scam/fake news patterns detected.",
                    confidence
                ),
                is_fake: Some(true),
                confidence: f64::from(confidence),
                source: SOURCE_FALLBACK.to_string(),
            }
        } else if scores.real >= DECISION_THRESHOLD {
            let confidence = confidence_for(scores.real);
            AnalysisResult {
                result: format!(
                    "✅ This appears to be reliable information (confidence: {}%). Contains credible source indicators.",
                    confidence
                ),
                is_fake: Some(false),
                confidence: f64::from(confidence),
                source: SOURCE_FALLBACK.to_string(),
            }
        } else {
            AnalysisResult {
                result: "🤔 Unable to determine reliability with basic analysis. Please verify with official sources.".to_string(),
                is_fake: None,
                confidence: f64::from(UNCERTAIN_CONFIDENCE),
                source: SOURCE_FALLBACK_UNCERTAIN.to_string(),
            }
        }
    }
}

/// Each phrase counts once, however many times it occurs.
fn weighted_matches(lower: &str, phrases: &[&str], weight: u32) -> u32 {
    phrases
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .count() as u32
        * weight
}

fn confidence_for(score: u32) -> u32 {
    (BASE_CONFIDENCE + CONFIDENCE_PER_POINT * score).min(MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_capped() {
        assert_eq!(confidence_for(3), 75);
        assert_eq!(confidence_for(7), 95);
        assert_eq!(confidence_for(40), 95);
    }

    #[test]
    fn test_phrase_counts_once() {
        let classifier = HeuristicClassifier::new();
        let scores = classifier.score("miracle miracle miracle");
        assert_eq!(scores.fake, MEDIUM_WEIGHT);
    }

    #[test]
    fn test_urgent_marker_is_case_sensitive() {
        let classifier = HeuristicClassifier::new();
        assert_eq!(classifier.score("URGENT! read").fake, URGENCY_WEIGHT);
        assert_eq!(classifier.score("urgent! read").fake, 0);
    }

    #[test]
    fn test_dollar_amount_needs_digits() {
        let classifier = HeuristicClassifier::new();
        assert_eq!(classifier.score("costs $ a lot").fake, 0);
        assert_eq!(classifier.score("costs $25").fake, DOLLAR_AMOUNT_WEIGHT);
    }

    #[test]
    fn test_dollar_amount_needs_ascii_digits() {
        let classifier = HeuristicClassifier::new();
        assert_eq!(classifier.score("only $٣ today").fake, 0);
        assert_eq!(classifier.score("only $１ today").fake, 0);
        assert_eq!(classifier.score("only $3 today").fake, DOLLAR_AMOUNT_WEIGHT);
    }
}
