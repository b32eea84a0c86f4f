use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Tag used when the heuristic classifier reached a verdict.
pub const SOURCE_FALLBACK: &str = "fallback_analysis";
/// Tag used when the heuristic classifier could not decide.
pub const SOURCE_FALLBACK_UNCERTAIN: &str = "fallback_uncertain";

/// The three-way outcome carried by `is_fake`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fake,
    Real,
    Unknown,
}

impl From<Option<bool>> for Verdict {
    fn from(is_fake: Option<bool>) -> Self {
        match is_fake {
            Some(true) => Verdict::Fake,
            Some(false) => Verdict::Real,
            None => Verdict::Unknown,
        }
    }
}

/// The outcome of classifying one user message, either remotely or locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisResult {
    /// Display text for the bot reply.
    pub result: String,
    /// `Some(true)` for fake, `Some(false)` for real, `None` when undecided.
    pub is_fake: Option<bool>,
    /// Confidence score between 0 and 100. Not a calibrated probability.
    #[validate(range(min = 0.0, max = 100.0))]
    pub confidence: f64,
    /// Which classifier produced this result.
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "unknown".to_string()
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from(self.is_fake)
    }

    /// Whether this result came from the local heuristic classifier.
    pub fn is_fallback(&self) -> bool {
        self.source == SOURCE_FALLBACK || self.source == SOURCE_FALLBACK_UNCERTAIN
    }
}

/// A single chat message as shown in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Local identifier, used to address feedback controls.
    pub id: Uuid,
    pub content: String,
    pub is_user: bool,
    /// Verdict attached to a bot reply; always `None` for user and history messages.
    pub is_fake: Option<bool>,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            is_user: true,
            is_fake: None,
            confidence: None,
            created_at: Utc::now(),
        }
    }

    /// A bot message without any verdict (welcome text, error text).
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            is_user: false,
            ..Self::user(content)
        }
    }

    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        Self {
            is_fake: analysis.is_fake,
            confidence: Some(analysis.confidence),
            ..Self::bot(analysis.result.clone())
        }
    }

    pub fn from_history(stored: StoredMessage) -> Self {
        let created_at = stored
            .timestamp
            .map(|ts| ts.and_utc())
            .unwrap_or_else(Utc::now);
        Self {
            id: Uuid::new_v4(),
            content: stored.content,
            is_user: stored.is_user,
            is_fake: None,
            confidence: None,
            created_at,
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from(self.is_fake)
    }
}

/// Wire shape of `/messages`, both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub content: String,
    pub is_user: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

impl StoredMessage {
    pub fn new(content: impl Into<String>, is_user: bool) -> Self {
        Self {
            content: content.into(),
            is_user,
            timestamp: None,
        }
    }
}

/// User agreement or disagreement with a verdict, posted to `/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user_message: String,
    pub bot_response: String,
    pub is_fake: bool,
    pub confidence: f64,
    /// `true` when the user confirmed the verdict was correct.
    pub user_feedback: bool,
}

/// A sample submitted to `/training-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub text: String,
    pub is_fake: bool,
    pub category: String,
    pub source: String,
}

impl TrainingSample {
    /// A sample flagged by the user from a chat reply.
    pub fn from_user(text: impl Into<String>, is_fake: bool) -> Self {
        Self {
            text: text.into(),
            is_fake,
            category: "user_added".to_string(),
            source: "user_feedback".to_string(),
        }
    }
}

/// A stored training sample as listed by `GET /training-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEntry {
    pub id: i64,
    pub text: String,
    pub is_fake: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

/// Counts reported by `/retrain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrainStats {
    pub total: u64,
    pub fake: u64,
    pub real: u64,
}

/// Response of `POST /retrain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainReport {
    pub message: String,
    pub success: bool,
    #[serde(default)]
    pub stats: Option<RetrainStats>,
}
