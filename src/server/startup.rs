//! Wiring from configuration to connected clients and shared state.

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::server::{
    config::Config,
    error::Error,
    esi::EsiClient,
    model::app::AppState,
    scheduler::events::PricingEvent,
    token::{StaticTokenProvider, REQUIRED_SCOPES},
    webhook::WebhookClient,
};

/// Connects to the database and brings the schema up to date.
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    let mut options = ConnectOptions::new(&config.database_url);
    options
        .sqlx_logging(false)
        .connect_timeout(Duration::from_secs(10));

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    info!("database connected, schema up to date");

    Ok(db)
}

/// Builds the shared application state from configuration.
pub fn build_app_state(
    config: Config,
    db: DatabaseConnection,
    pricing_events: mpsc::Sender<PricingEvent>,
) -> Result<AppState, Error> {
    let esi_client = EsiClient::new(&config.user_agent)?;

    if config.esi_access_token.is_none() {
        warn!(
            "no ESI access token configured; syncs will fail until a token with scopes {REQUIRED_SCOPES:?} is provided"
        );
    }

    let operator_webhook = config
        .operator_webhook_url
        .as_deref()
        .map(WebhookClient::new)
        .transpose()?;
    let customer_webhook = config
        .customer_webhook_url
        .as_deref()
        .map(WebhookClient::new)
        .transpose()?;
    if operator_webhook.is_none() && customer_webhook.is_none() {
        info!("no webhooks configured, contracts will sync silently");
    }

    let tokens = Arc::new(StaticTokenProvider::new(config.esi_access_token.clone()));

    Ok(AppState {
        db,
        esi_client,
        tokens,
        config: Arc::new(config),
        operator_webhook,
        customer_webhook,
        pricing_events,
        sync_lock: Arc::new(Mutex::new(())),
    })
}
