//! Candidate loader — assignments due on a date that still need a reminder.
//!
//! The store returns every assignment due on the target date; status
//! filtering happens here against the typed [`AssignmentStatus`] so that
//! unknown or malformed values are simply not active.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use duewise_common::error::AppError;
use duewise_common::types::{Assignment, AssignmentStatus};

/// Read access to assignments and their recipients.
#[async_trait]
pub trait AssignmentSource: Send + Sync {
    /// All assignments whose due date equals `date`, regardless of status.
    async fn load_due(&self, date: NaiveDate) -> Result<Vec<Assignment>, AppError>;
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    title: String,
    due_date: NaiveDate,
    status: Option<String>,
    recipients: Vec<String>,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Assignment {
            id: row.id,
            title: row.title,
            due_date: row.due_date,
            status: AssignmentStatus::parse(row.status.as_deref().unwrap_or_default()),
            recipients: row.recipients,
        }
    }
}

/// Postgres-backed assignment source.
pub struct PgAssignmentSource {
    pool: PgPool,
}

impl PgAssignmentSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentSource for PgAssignmentSource {
    async fn load_due(&self, date: NaiveDate) -> Result<Vec<Assignment>, AppError> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.title, a.due_date, a.status,
                   COALESCE(
                       array_agg(e.email ORDER BY e.id) FILTER (WHERE e.email IS NOT NULL),
                       ARRAY[]::TEXT[]
                   ) AS recipients
            FROM assignments a
            LEFT JOIN assignment_emails e ON e.assignment_id = a.id
            WHERE a.due_date = $1
            GROUP BY a.id
            ORDER BY a.created_at, a.id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }
}

/// Loads reminder candidates for one target date.
pub struct CandidateLoader {
    source: Arc<dyn AssignmentSource>,
    active: Vec<AssignmentStatus>,
}

impl CandidateLoader {
    pub fn new(source: Arc<dyn AssignmentSource>, active: Vec<AssignmentStatus>) -> Self {
        Self { source, active }
    }

    /// Build the active set from configured status names.
    pub fn with_status_names(source: Arc<dyn AssignmentSource>, names: &[String]) -> Self {
        let active = names.iter().map(|n| AssignmentStatus::parse(n)).collect();
        Self::new(source, active)
    }

    pub fn is_active(&self, status: &AssignmentStatus) -> bool {
        self.active.contains(status)
    }

    /// Active assignments due on `date`.
    ///
    /// Any store failure is reported as [`AppError::Load`].
    pub async fn load(&self, date: NaiveDate) -> Result<Vec<Assignment>, AppError> {
        let all = self.source.load_due(date).await.map_err(|e| match e {
            AppError::Load(_) => e,
            other => AppError::Load(other.to_string()),
        })?;
        let loaded = all.len();

        let candidates: Vec<Assignment> = all
            .into_iter()
            .filter(|a| self.is_active(&a.status))
            .collect();

        tracing::debug!(
            %date,
            loaded,
            active = candidates.len(),
            "Loaded reminder candidates"
        );

        Ok(candidates)
    }
}
