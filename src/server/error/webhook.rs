use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Message failed client-side validation and was never sent.
    #[error("webhook content is {len} characters, limit is {limit}")]
    ContentTooLong { len: usize, limit: usize },
    #[error("webhook embed serializes to {len} characters, limit is {limit}")]
    EmbedTooLarge { len: usize, limit: usize },
    #[error("failed to serialize webhook payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("webhook endpoint returned status {0}")]
    Status(StatusCode),
}
