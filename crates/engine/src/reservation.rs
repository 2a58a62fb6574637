//! Reservation gate — the at-most-once guarantee.
//!
//! A reminder may only be sent after its `(assignment, email, kind, date)`
//! tuple has been inserted into `reminder_sends`. The table's unique
//! constraint makes the insert an atomic claim that holds across processes,
//! so overlapping runs can never both be granted the same tuple.
//!
//! Every insert failure, including transient database errors, denies the
//! claim. A missed reminder is preferred over a duplicate one.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use duewise_common::error::AppError;
use duewise_common::types::ReservationRecord;

/// Insert-if-absent storage for reservation records.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Returns `Ok(true)` only if this call created the record.
    async fn insert_if_absent(&self, record: &ReservationRecord) -> Result<bool, AppError>;
}

/// Postgres-backed reservation store.
pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn insert_if_absent(&self, record: &ReservationRecord) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO reminder_sends (assignment_id, email, kind, reminder_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (assignment_id, email, kind, reminder_date) DO NOTHING
            "#,
        )
        .bind(record.assignment_id)
        .bind(&record.email)
        .bind(record.kind.to_string())
        .bind(record.reminder_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Grants or denies reminder obligations. Never fails.
pub struct ReservationGate {
    store: Arc<dyn ReservationStore>,
}

impl ReservationGate {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Try to claim `record`. `true` means the caller owns the send.
    pub async fn try_reserve(&self, record: &ReservationRecord) -> bool {
        match self.store.insert_if_absent(record).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!(
                    assignment_id = %record.assignment_id,
                    email = %record.email,
                    kind = %record.kind,
                    reminder_date = %record.reminder_date,
                    "Reminder already reserved"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    assignment_id = %record.assignment_id,
                    email = %record.email,
                    kind = %record.kind,
                    reminder_date = %record.reminder_date,
                    error = %e,
                    "Reservation insert failed, treating as already reserved"
                );
                false
            }
        }
    }
}
