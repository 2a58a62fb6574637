//! Dispatch queue — turns candidates into notification tasks.
//!
//! Recipients are processed one at a time: a task is only enqueued after the
//! reservation gate has granted its tuple. A run-local set of granted keys
//! catches duplicate recipient rows before they reach the store.

use std::collections::HashSet;

use chrono::NaiveDate;

use duewise_common::types::{
    Assignment, NotificationTask, ReminderKind, ReservationRecord, normalize_email,
};

use crate::reservation::ReservationGate;

/// Per-run queue of granted notification tasks.
pub struct DispatchQueue<'a> {
    gate: &'a ReservationGate,
    seen: HashSet<ReservationRecord>,
    tasks: Vec<NotificationTask>,
    denied: usize,
}

impl<'a> DispatchQueue<'a> {
    pub fn new(gate: &'a ReservationGate) -> Self {
        Self {
            gate,
            seen: HashSet::new(),
            tasks: Vec::new(),
            denied: 0,
        }
    }

    /// Reserve and enqueue every recipient of `candidates` for `kind` on
    /// `reminder_date`.
    pub async fn enqueue_all(
        &mut self,
        candidates: &[Assignment],
        kind: ReminderKind,
        reminder_date: NaiveDate,
    ) {
        for assignment in candidates {
            for raw in &assignment.recipients {
                let email = normalize_email(raw);
                if email.is_empty() {
                    continue;
                }

                let key = ReservationRecord {
                    assignment_id: assignment.id,
                    email,
                    kind,
                    reminder_date,
                };

                // Same recipient listed twice for one assignment
                if self.seen.contains(&key) {
                    continue;
                }

                // Only a grant marks the key as handled; a duplicate row may
                // retry a tuple whose earlier attempt was denied.
                if !self.gate.try_reserve(&key).await {
                    self.denied += 1;
                    continue;
                }
                self.seen.insert(key.clone());

                let (subject, body) = render(kind, assignment);
                self.tasks.push(NotificationTask {
                    assignment_id: assignment.id,
                    kind,
                    recipient: key.email,
                    subject,
                    body,
                });
            }
        }
    }

    /// Number of tuples the gate refused so far.
    pub fn denied(&self) -> usize {
        self.denied
    }

    pub fn into_tasks(self) -> Vec<NotificationTask> {
        self.tasks
    }
}

/// Render the subject line and HTML body for a reminder.
pub fn render(kind: ReminderKind, assignment: &Assignment) -> (String, String) {
    let title = &assignment.title;
    let due = assignment.due_date;
    let html_title = escape_html(title);

    match kind {
        ReminderKind::DueIn3Days => (
            format!("Reminder: \"{}\" due {}", title, due),
            format!(
                "<p>Hello,</p><p>This is a friendly reminder that <strong>{}</strong> is due on <strong>{}</strong>.</p>",
                html_title, due
            ),
        ),
        ReminderKind::DueToday => (
            format!("Due today: \"{}\"", title),
            format!(
                "<p>Hello,</p><p><strong>{}</strong> is <strong>due today ({})</strong>.</p>",
                html_title, due
            ),
        ),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
