use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an assignment.
///
/// The upstream store keeps status as free text; it is normalized (trimmed,
/// lower-cased) exactly once, here, when a row crosses into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentStatus {
    Incomplete,
    Pending,
    Complete,
    /// Any other value, kept in normalized form. Includes the empty string
    /// for a missing status.
    Other(String),
}

impl AssignmentStatus {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "incomplete" => AssignmentStatus::Incomplete,
            "pending" => AssignmentStatus::Pending,
            "complete" => AssignmentStatus::Complete,
            _ => AssignmentStatus::Other(normalized),
        }
    }

    /// The default reminder-eligible set.
    pub fn default_active() -> Vec<AssignmentStatus> {
        vec![AssignmentStatus::Incomplete, AssignmentStatus::Pending]
    }
}

impl From<String> for AssignmentStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<AssignmentStatus> for String {
    fn from(status: AssignmentStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Incomplete => write!(f, "incomplete"),
            AssignmentStatus::Pending => write!(f, "pending"),
            AssignmentStatus::Complete => write!(f, "complete"),
            AssignmentStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Which reminder window an obligation belongs to.
///
/// Stored in `reminder_sends.kind` as its `Display` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    #[serde(rename = "due_in_3_days")]
    DueIn3Days,
    DueToday,
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderKind::DueIn3Days => write!(f, "due_in_3_days"),
            ReminderKind::DueToday => write!(f, "due_today"),
        }
    }
}

/// An assignment as seen by the reminder engine. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub due_date: NaiveDate,
    pub status: AssignmentStatus,
    /// Recipient addresses exactly as stored (not yet normalized).
    pub recipients: Vec<String>,
}

/// A claimed reminder obligation.
///
/// The row's existence in `reminder_sends` means the obligation has been
/// handled. Within a run the same tuple doubles as the in-memory dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub assignment_id: Uuid,
    /// Normalized (trimmed, lower-cased) recipient address.
    pub email: String,
    pub kind: ReminderKind,
    pub reminder_date: NaiveDate,
}

/// A rendered email ready for delivery. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTask {
    pub assignment_id: Uuid,
    pub kind: ReminderKind,
    pub recipient: String,
    pub subject: String,
    /// HTML body
    pub body: String,
}

/// A single send that failed after its reservation was granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDelivery {
    pub assignment_id: Uuid,
    pub kind: ReminderKind,
    pub recipient: String,
    pub error: String,
}

/// Outcome of one reminder run, returned by the trigger endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ok: bool,
    pub version: String,
    pub tz: String,
    pub today: NaiveDate,
    pub in3: NaiveDate,
    /// Active candidates due today
    pub due_today: usize,
    /// Active candidates due at the lead offset
    pub due_in_3_days: usize,
    pub attempted_sends: usize,
    pub successes: usize,
    pub failures: usize,
    pub failed: Vec<FailedDelivery>,
}

/// Normalize an email address for comparison and storage.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
