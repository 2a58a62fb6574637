//! Result aggregation for a single run.

use chrono_tz::Tz;

use duewise_common::types::{FailedDelivery, RunSummary};

use crate::fanout::DeliveryOutcome;
use crate::window::ReminderWindow;

/// Fold per-task outcomes into the run summary.
///
/// Partial send failure still produces an `ok` summary; individual failures
/// are listed in `failed`.
pub fn summarize(
    tz: Tz,
    window: ReminderWindow,
    due_today: usize,
    due_in_3_days: usize,
    outcomes: &[DeliveryOutcome],
) -> RunSummary {
    let failed: Vec<FailedDelivery> = outcomes
        .iter()
        .filter_map(|o| {
            o.result.as_ref().err().map(|error| FailedDelivery {
                assignment_id: o.assignment_id,
                kind: o.kind,
                recipient: o.recipient.clone(),
                error: error.clone(),
            })
        })
        .collect();

    RunSummary {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        tz: tz.name().to_string(),
        today: window.today,
        in3: window.due_in_3,
        due_today,
        due_in_3_days,
        attempted_sends: outcomes.len(),
        successes: outcomes.len() - failed.len(),
        failures: failed.len(),
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::date;
    use duewise_common::types::ReminderKind;
    use uuid::Uuid;

    fn outcome(recipient: &str, result: Result<(), String>) -> DeliveryOutcome {
        DeliveryOutcome {
            assignment_id: Uuid::nil(),
            kind: ReminderKind::DueIn3Days,
            recipient: recipient.to_string(),
            result,
        }
    }

    #[test]
    fn test_counts_partial_failure() {
        let window = ReminderWindow {
            today: date("2025-01-01"),
            due_in_3: date("2025-01-04"),
        };
        let outcomes = vec![
            outcome("a@x.com", Ok(())),
            outcome("b@x.com", Err("HTTP error: timeout".into())),
            outcome("c@x.com", Ok(())),
        ];

        let summary = summarize(chrono_tz::UTC, window, 2, 1, &outcomes);

        assert!(summary.ok);
        assert_eq!(summary.tz, "UTC");
        assert_eq!(summary.today, date("2025-01-01"));
        assert_eq!(summary.in3, date("2025-01-04"));
        assert_eq!(summary.due_today, 2);
        assert_eq!(summary.due_in_3_days, 1);
        assert_eq!(summary.attempted_sends, 3);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.failed[0].recipient, "b@x.com");
        assert_eq!(summary.failed[0].error, "HTTP error: timeout");
    }

    #[test]
    fn test_empty_run() {
        let window = ReminderWindow {
            today: date("2025-01-01"),
            due_in_3: date("2025-01-04"),
        };
        let summary = summarize(chrono_tz::Europe::Berlin, window, 0, 0, &[]);
        assert_eq!(summary.tz, "Europe/Berlin");
        assert_eq!(summary.attempted_sends, 0);
        assert!(summary.failed.is_empty());
    }
}
