//! Duewise API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use duewise_common::config::AppConfig;
use duewise_common::db::{create_pool, run_migrations};
use duewise_engine::ReminderEngine;
use duewise_engine::loader::PgAssignmentSource;
use duewise_engine::reservation::PgReservationStore;
use duewise_notifier::ResendTransport;

use duewise_api::routes::create_router;
use duewise_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("duewise_api=debug,duewise_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting Duewise API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    run_migrations(&pool).await?;

    // Wire the reminder engine
    let engine = ReminderEngine::from_config(
        &config,
        Arc::new(PgAssignmentSource::new(pool.clone())),
        Arc::new(PgReservationStore::new(pool)),
        Arc::new(ResendTransport::from_config(&config)),
    )?;
    tracing::info!(
        tz = %config.timezone,
        active_statuses = ?config.active_statuses,
        lead_days = config.reminder_lead_days,
        "Reminder engine ready"
    );

    // Build application state
    let port = config.port;
    let state = AppState::new(engine, config);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
