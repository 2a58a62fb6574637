//! Reminder trigger route, called by the external scheduler.

use axum::extract::{Query, State};
use axum::http::{HeaderValue, header};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::set_header::SetResponseHeaderLayer;

use duewise_common::error::AppError;
use duewise_common::types::RunSummary;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/cron/send-reminders",
            get(send_reminders).post(send_reminders),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Query parameters for a reminder run.
#[derive(Debug, Deserialize)]
pub struct TriggerParams {
    /// Replay the run as if today were this ISO date (`YYYY-MM-DD`).
    pub date: Option<String>,
}

/// GET|POST /api/cron/send-reminders — Run the reminder engine once.
async fn send_reminders(
    State(state): State<AppState>,
    Query(params): Query<TriggerParams>,
) -> Result<Json<RunSummary>, AppError> {
    let summary = state
        .engine
        .run(params.date.as_deref())
        .await
        .inspect_err(|e| tracing::error!(error = %e, date = ?params.date, "Reminder run aborted"))?;
    Ok(Json(summary))
}
