//! In-process pricing change events.
//!
//! Whatever surface edits pricing rules sends one event here instead of calling
//! the reconciliation inline; the listener folds bursts of edits into
//! sequential reconcile runs.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::server::{model::app::AppState, scheduler::run_reconcile};

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingEvent {
    /// A rule was created, changed, or deactivated
    RulesChanged,
}

pub fn pricing_channel() -> (mpsc::Sender<PricingEvent>, mpsc::Receiver<PricingEvent>) {
    mpsc::channel(CHANNEL_CAPACITY)
}

/// Spawns the listener task. It ends when every sender is dropped.
pub fn spawn_pricing_listener(
    state: AppState,
    mut receiver: mpsc::Receiver<PricingEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            debug!("pricing event received: {event:?}");
            if let Err(err) = run_reconcile(&state).await {
                error!("pricing reconciliation failed: {err}");
            }
        }
        debug!("pricing event channel closed");
    })
}
