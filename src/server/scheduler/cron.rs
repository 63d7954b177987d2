//! Periodic contract sync on a cron schedule.

use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::server::{error::Error, model::app::AppState, scheduler::run_sync};

/// Registers and starts the periodic sync job. The returned scheduler must stay
/// alive for jobs to keep firing.
pub async fn start_scheduler(state: &AppState) -> Result<JobScheduler, Error> {
    let scheduler = JobScheduler::new().await?;

    let job_state = state.clone();
    let job = Job::new_async(state.config.sync_cron.as_str(), move |_uuid, _lock| {
        let state = job_state.clone();
        Box::pin(async move {
            match run_sync(&state, false).await {
                Ok(outcome) => info!(
                    "scheduled sync done: changed={} synced={} failures={} code={:?}",
                    outcome.changed, outcome.synced, outcome.failures, outcome.error
                ),
                Err(err) => error!("scheduled sync failed: {err}"),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("contract sync scheduled with cron {}", state.config.sync_cron);

    Ok(scheduler)
}
