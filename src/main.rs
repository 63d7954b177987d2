use tracing::info;
use tracing_subscriber::EnvFilter;

use freight::server::{config::Config, scheduler, startup};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("configuration is incomplete");
    let db = startup::connect_to_database(&config)
        .await
        .expect("database connection failed");

    let (pricing_tx, pricing_rx) = scheduler::events::pricing_channel();
    let state =
        startup::build_app_state(config, db, pricing_tx).expect("state construction failed");
    let _listener = scheduler::events::spawn_pricing_listener(state.clone(), pricing_rx);

    let _scheduler = scheduler::cron::start_scheduler(&state)
        .await
        .expect("scheduler startup failed");

    info!("freight service running, waiting for shutdown signal");
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    info!("shutting down");
}
