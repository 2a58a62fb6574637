//! In-memory fakes of the engine's collaborators for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use duewise_common::error::AppError;
use duewise_common::types::{Assignment, AssignmentStatus, ReservationRecord};
use duewise_notifier::{EmailTransport, NotifyError};

use crate::loader::AssignmentSource;
use crate::reservation::ReservationStore;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn assignment(title: &str, due: NaiveDate, status: &str, recipients: &[&str]) -> Assignment {
    Assignment {
        id: Uuid::new_v4(),
        title: title.to_string(),
        due_date: due,
        status: AssignmentStatus::parse(status),
        recipients: recipients.iter().map(|r| r.to_string()).collect(),
    }
}

pub struct InMemoryAssignments {
    rows: Vec<Assignment>,
    fail: bool,
}

impl InMemoryAssignments {
    pub fn new(rows: Vec<Assignment>) -> Self {
        Self { rows, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl AssignmentSource for InMemoryAssignments {
    async fn load_due(&self, date: NaiveDate) -> Result<Vec<Assignment>, AppError> {
        if self.fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .rows
            .iter()
            .filter(|a| a.due_date == date)
            .cloned()
            .collect())
    }
}

/// Reservation store with a uniqueness set; emails in `failing` error out,
/// as do the first `erroring_calls` inserts.
pub struct InMemoryReservations {
    records: Mutex<HashSet<ReservationRecord>>,
    failing: HashSet<String>,
    erroring_calls: usize,
    attempts: AtomicUsize,
}

impl InMemoryReservations {
    pub fn new() -> Self {
        Self::failing_for(&[])
    }

    pub fn failing_for(emails: &[&str]) -> Self {
        Self {
            records: Mutex::new(HashSet::new()),
            failing: emails.iter().map(|e| e.to_string()).collect(),
            erroring_calls: 0,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn erroring_first(calls: usize) -> Self {
        Self {
            erroring_calls: calls,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn contains(&self, record: &ReservationRecord) -> bool {
        self.records.lock().unwrap().contains(record)
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservations {
    async fn insert_if_absent(&self, record: &ReservationRecord) -> Result<bool, AppError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.erroring_calls || self.failing.contains(&record.email) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.records.lock().unwrap().insert(record.clone()))
    }
}

/// Transport that records successful recipients.
pub struct RecordingTransport {
    delivered: Mutex<Vec<String>>,
    failing: HashSet<String>,
    panicking: HashSet<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            panicking: HashSet::new(),
        }
    }

    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn panicking_for(recipients: &[&str]) -> Self {
        Self {
            panicking: recipients.iter().map(|r| r.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(&self, to: &str, _subject: &str, _html: &str) -> Result<(), NotifyError> {
        if self.panicking.contains(to) {
            panic!("transport blew up for {to}");
        }
        if self.failing.contains(to) {
            return Err(NotifyError::Rejected {
                status: 422,
                body: "invalid recipient".to_string(),
            });
        }
        self.delivered.lock().unwrap().push(to.to_string());
        Ok(())
    }
}
