use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EsiError {
    /// Transport-level failure (connection, TLS, body decoding).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// ESI answered with a non-success status.
    #[error("ESI request to {path} returned status {status}")]
    Status { status: StatusCode, path: String },
}

impl EsiError {
    /// HTTP status of the failed request, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ReqwestError(err) => err.status(),
            Self::Status { status, .. } => Some(*status),
        }
    }
}
