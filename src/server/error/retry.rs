use reqwest::StatusCode;
use sea_orm::DbErr;

use super::Error;

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient upstream failure)
    Retry,
    /// Failed permanently (bad request, configuration, data issue)
    Fail,
}

/// Upstream statuses worth retrying. 502/503/504 are ESI having a moment; 500s
/// and 4xx mean the request itself is wrong and a retry would just repeat it.
fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::EsiError(esi_error) => match esi_error.status() {
                Some(status) if is_transient_status(status) => ErrorRetryStrategy::Retry,
                Some(_) => ErrorRetryStrategy::Fail,
                // Network error or connection issue - should retry
                None => ErrorRetryStrategy::Retry,
            },

            Self::DbErr(db_err) => match db_err {
                // Connection acquisition and connection errors are transient
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,
                // Everything else (constraint violations, type conversions,
                // missing records) indicates a bug or data issue
                _ => ErrorRetryStrategy::Fail,
            },

            // Configuration, token, and validation failures won't resolve on retry
            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::TokenError(_) => ErrorRetryStrategy::Fail,
            Self::WebhookError(_) => ErrorRetryStrategy::Fail,
            Self::SyncError(_) => ErrorRetryStrategy::Fail,
            Self::PricingInput(_) => ErrorRetryStrategy::Fail,
            Self::SerdeJson(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
