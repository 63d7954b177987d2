//! Job orchestration: the periodic sync run and the pricing event listener.

pub mod cron;
pub mod events;

use tracing::{info, warn};

use crate::server::{
    data::handler::HandlerRepository,
    error::{sync::SyncError, Error},
    model::app::AppState,
    service::{
        notification::{NotificationOptions, NotificationService},
        pricing::PricingService,
        sync::{ContractSyncService, SyncOutcome},
    },
};

/// One full pipeline pass: ingest, then announce whatever the run produced.
///
/// Concurrent triggers are rejected rather than queued; the cron job simply
/// fires again later.
pub async fn run_sync(state: &AppState, force: bool) -> Result<SyncOutcome, Error> {
    let Ok(_guard) = state.sync_lock.try_lock() else {
        return Err(SyncError::AlreadyRunning.into());
    };

    let sync_service = ContractSyncService::new(
        &state.db,
        &state.esi_client,
        state.tokens.as_ref(),
        state.config.price_per_volume_modifier_percent,
    );
    let outcome = sync_service.ingest(force).await?;

    if outcome.changed {
        let delivered = notifier(state).dispatch(true, false).await?;
        if !delivered {
            warn!("some notifications were not delivered, they stay due");
        }
    }

    Ok(outcome)
}

/// Reacts to a pricing rule change: re-evaluate every open contract against the
/// new route table, then announce anything that became due.
pub async fn run_reconcile(state: &AppState) -> Result<(), Error> {
    let _guard = state.sync_lock.lock().await;

    let Some(handler) = HandlerRepository::new(&state.db).get().await? else {
        info!("no handler installed, nothing to reconcile");
        return Ok(());
    };

    let updated = PricingService::new(&state.db, state.config.price_per_volume_modifier_percent)
        .reconcile(handler.id)
        .await?;

    if updated > 0 {
        let delivered = notifier(state).dispatch(true, false).await?;
        if !delivered {
            warn!("some notifications were not delivered, they stay due");
        }
    }

    Ok(())
}

fn notifier(state: &AppState) -> NotificationService<'_> {
    NotificationService::new(
        &state.db,
        state.operator_webhook.as_ref(),
        state.customer_webhook.as_ref(),
        NotificationOptions::from(state.config.as_ref()),
    )
}
