//! Reminder run orchestration.
//!
//! One call to [`ReminderEngine::run`] is one logical run:
//! 1. Compute today and the lead date (`WindowCalculator`)
//! 2. Load both candidate sets concurrently (`CandidateLoader`)
//! 3. Reserve and enqueue lead-window tasks, then due-today tasks (`DispatchQueue`)
//! 4. Send everything concurrently (`FanoutExecutor`)
//! 5. Fold outcomes into a `RunSummary`
//!
//! Only a bad override date or a load failure aborts the run. Runs share no
//! state except the reservation store, so retries and overlapping triggers
//! are safe.

use std::sync::Arc;

use duewise_common::config::AppConfig;
use duewise_common::error::AppError;
use duewise_common::types::{ReminderKind, RunSummary};
use duewise_notifier::EmailTransport;

use crate::dispatch::DispatchQueue;
use crate::fanout::FanoutExecutor;
use crate::loader::{AssignmentSource, CandidateLoader};
use crate::reservation::{ReservationGate, ReservationStore};
use crate::summary::summarize;
use crate::window::WindowCalculator;

pub struct ReminderEngine {
    window: WindowCalculator,
    loader: CandidateLoader,
    gate: ReservationGate,
    executor: FanoutExecutor,
}

impl ReminderEngine {
    pub fn new(
        window: WindowCalculator,
        loader: CandidateLoader,
        gate: ReservationGate,
        executor: FanoutExecutor,
    ) -> Self {
        Self {
            window,
            loader,
            gate,
            executor,
        }
    }

    /// Wire an engine from configuration and its three collaborators.
    pub fn from_config(
        config: &AppConfig,
        assignments: Arc<dyn AssignmentSource>,
        reservations: Arc<dyn ReservationStore>,
        transport: Arc<dyn EmailTransport>,
    ) -> Result<Self, AppError> {
        let window = WindowCalculator::new(&config.timezone, config.reminder_lead_days)?;
        let loader = CandidateLoader::with_status_names(assignments, &config.active_statuses);
        if config.active_statuses.is_empty() {
            tracing::warn!("ACTIVE_STATUSES is empty, no assignment will ever be reminded");
        }

        Ok(Self::new(
            window,
            loader,
            ReservationGate::new(reservations),
            FanoutExecutor::new(transport),
        ))
    }

    /// Execute one reminder run.
    ///
    /// `override_date` (ISO `YYYY-MM-DD`) replaces today's date for replay
    /// and testing.
    pub async fn run(&self, override_date: Option<&str>) -> Result<RunSummary, AppError> {
        let window = self.window.compute(override_date)?;
        tracing::info!(
            today = %window.today,
            in3 = %window.due_in_3,
            tz = %self.window.timezone(),
            "Starting reminder run"
        );

        let (due_today, due_in_3) = tokio::try_join!(
            self.loader.load(window.today),
            self.loader.load(window.due_in_3),
        )?;

        let mut queue = DispatchQueue::new(&self.gate);
        queue
            .enqueue_all(&due_in_3, ReminderKind::DueIn3Days, window.due_in_3)
            .await;
        queue
            .enqueue_all(&due_today, ReminderKind::DueToday, window.today)
            .await;
        let denied = queue.denied();
        let tasks = queue.into_tasks();

        let outcomes = self.executor.execute(tasks).await;
        let summary = summarize(
            self.window.timezone(),
            window,
            due_today.len(),
            due_in_3.len(),
            &outcomes,
        );

        tracing::info!(
            today = %summary.today,
            due_today = summary.due_today,
            due_in_3_days = summary.due_in_3_days,
            denied,
            attempted_sends = summary.attempted_sends,
            successes = summary.successes,
            failures = summary.failures,
            "Reminder run finished"
        );

        Ok(summary)
    }
}
