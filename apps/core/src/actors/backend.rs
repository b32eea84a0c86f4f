use crate::actors::messages::AppError;
use crate::actors::traits::ChatBackend;
use crate::models::{
    AnalysisResult, FeedbackRecord, RetrainReport, StoredMessage, TrainingEntry, TrainingSample,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;
use validator::Validate;

// --- Endpoints ---
const ANALYZE_PATH: &str = "analyze";
const MESSAGES_PATH: &str = "messages";
const FEEDBACK_PATH: &str = "feedback";
const TRAINING_DATA_PATH: &str = "training-data";
const RETRAIN_PATH: &str = "retrain";

/// HTTP client for the verification backend.
///
/// No timeout is configured beyond reqwest's defaults and nothing is retried.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// `base_url` must end with `/` for endpoints to be joined under it.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, AppError> {
        let res = self
            .client
            .post(self.endpoint(path)?)
            .json(payload)
            .send()
            .await?;
        ensure_success(res).await
    }
}

/// Turns any non-2xx response into `AppError::Backend`, keeping the body for the logs.
async fn ensure_success(res: Response) -> Result<Response, AppError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(AppError::Backend {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ChatBackend for HttpBackend {
    #[instrument(skip(self, text))]
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AppError> {
        info!("Sending analysis request");
        let res = self
            .post_json(ANALYZE_PATH, &serde_json::json!({ "text": text }))
            .await?;
        let result: AnalysisResult = res.json().await?;
        result
            .validate()
            .map_err(|e| AppError::Decode(format!("Invalid analysis payload: {}", e)))?;
        info!(source = %result.source, confidence = result.confidence, "Analysis successful");
        Ok(result)
    }

    async fn save_message(&self, message: &StoredMessage) -> Result<(), AppError> {
        self.post_json(MESSAGES_PATH, message).await?;
        debug!(is_user = message.is_user, "Message saved");
        Ok(())
    }

    async fn fetch_messages(&self) -> Result<Vec<StoredMessage>, AppError> {
        let res = self.client.get(self.endpoint(MESSAGES_PATH)?).send().await?;
        let messages = ensure_success(res).await?.json().await?;
        Ok(messages)
    }

    async fn send_feedback(&self, record: &FeedbackRecord) -> Result<(), AppError> {
        self.post_json(FEEDBACK_PATH, record).await?;
        Ok(())
    }

    async fn add_training_sample(&self, sample: &TrainingSample) -> Result<(), AppError> {
        self.post_json(TRAINING_DATA_PATH, sample).await?;
        Ok(())
    }

    async fn list_training_data(&self) -> Result<Vec<TrainingEntry>, AppError> {
        let res = self
            .client
            .get(self.endpoint(TRAINING_DATA_PATH)?)
            .send()
            .await?;
        let entries = ensure_success(res).await?.json().await?;
        Ok(entries)
    }

    async fn delete_training_data(&self, id: i64) -> Result<(), AppError> {
        let url = self.endpoint(&format!("{}/{}", TRAINING_DATA_PATH, id))?;
        let res = self.client.delete(url).send().await?;
        ensure_success(res).await?;
        Ok(())
    }

    async fn retrain(&self) -> Result<RetrainReport, AppError> {
        let res = self.client.post(self.endpoint(RETRAIN_PATH)?).send().await?;
        let report = ensure_success(res).await?.json().await?;
        Ok(report)
    }
}
