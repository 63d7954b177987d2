//! Error types for the freight server.
//!
//! One `thiserror` enum per domain, aggregated into a single [`Error`] with
//! `#[from]` conversions so the `?` operator works across layers. Retry
//! classification for transient upstream failures lives in [`retry`].

pub mod config;
pub mod esi;
pub mod retry;
pub mod sync;
pub mod token;
pub mod webhook;

use thiserror::Error;

use crate::server::error::{
    config::ConfigError, esi::EsiError, sync::SyncError, token::TokenError, webhook::WebhookError,
};

/// Main error type for the freight server.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// ESI request error (HTTP failures, unexpected statuses, missing headers).
    #[error(transparent)]
    EsiError(#[from] EsiError),
    /// Access token error (missing, expired, or rejected credential).
    #[error(transparent)]
    TokenError(#[from] TokenError),
    /// Webhook error (payload validation, delivery failures).
    #[error(transparent)]
    WebhookError(#[from] WebhookError),
    /// Contract sync error (handler configuration, overlapping runs).
    #[error(transparent)]
    SyncError(#[from] SyncError),
    /// Pricing computation called with arguments that violate its contract.
    #[error("pricing input out of range: {0}")]
    PricingInput(String),
    /// Serialization error (contract fingerprinting, issue lists).
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
