use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::{mpsc, Mutex};

use crate::server::{
    config::Config, esi::EsiClient, scheduler::events::PricingEvent,
    token::AccessTokenProvider, webhook::WebhookClient,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub esi_client: EsiClient,
    pub tokens: Arc<dyn AccessTokenProvider>,
    pub config: Arc<Config>,
    pub operator_webhook: Option<WebhookClient>,
    pub customer_webhook: Option<WebhookClient>,
    /// Rule mutations announce themselves here; the listener task reconciles
    pub pricing_events: mpsc::Sender<PricingEvent>,
    /// Serializes sync executions for the installed handler; overlapping triggers
    /// are rejected rather than interleaved
    pub sync_lock: Arc<Mutex<()>>,
}
