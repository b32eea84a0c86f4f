use crate::actors::messages::AppError;
use crate::models::{
    AnalysisResult, FeedbackRecord, RetrainReport, StoredMessage, TrainingEntry, TrainingSample,
};
use async_trait::async_trait;

/// Defines the public interface of the remote news-verification backend.
///
/// This trait abstracts the transport, allowing the HTTP client to be swapped for
/// in-memory doubles. Implementations report transport failures as
/// `AppError::Network` and non-success statuses as `AppError::Backend`.
#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    /// Classifies a piece of text remotely.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AppError>;

    /// Appends one message to the remote conversation log.
    async fn save_message(&self, message: &StoredMessage) -> Result<(), AppError>;

    /// Returns the remote conversation log, oldest first.
    async fn fetch_messages(&self) -> Result<Vec<StoredMessage>, AppError>;

    /// Records whether the user agreed with a verdict.
    async fn send_feedback(&self, record: &FeedbackRecord) -> Result<(), AppError>;

    /// Adds a sample to the training set.
    async fn add_training_sample(&self, sample: &TrainingSample) -> Result<(), AppError>;

    /// Lists the training set, newest first.
    async fn list_training_data(&self) -> Result<Vec<TrainingEntry>, AppError>;

    /// Removes one sample from the training set.
    async fn delete_training_data(&self, id: i64) -> Result<(), AppError>;

    /// Asks the backend to refresh its model from the training set.
    async fn retrain(&self) -> Result<RetrainReport, AppError>;
}
