//! Fan-out executor — concurrent, failure-isolated delivery.
//!
//! Each task runs on its own Tokio task inside a `JoinSet`. Outcomes are
//! collected one by one, so a failed or panicking send is recorded against
//! its own task and never cancels its siblings. Nothing is retried and no
//! reservation is released on failure.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use uuid::Uuid;

use duewise_common::types::{NotificationTask, ReminderKind};
use duewise_notifier::EmailTransport;

/// Result of delivering one task. The rendered message is not kept.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub assignment_id: Uuid,
    pub kind: ReminderKind,
    pub recipient: String,
    pub result: Result<(), String>,
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct FanoutExecutor {
    transport: Arc<dyn EmailTransport>,
}

impl FanoutExecutor {
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self { transport }
    }

    /// Send every task concurrently and wait for all of them.
    ///
    /// Returns one outcome per task, in completion order.
    pub async fn execute(&self, tasks: Vec<NotificationTask>) -> Vec<DeliveryOutcome> {
        let mut set = JoinSet::new();
        let mut in_flight = HashMap::with_capacity(tasks.len());

        for task in tasks {
            let transport = Arc::clone(&self.transport);
            let identity = (task.assignment_id, task.kind, task.recipient.clone());
            let handle = set.spawn(async move {
                let result = transport
                    .send(&task.recipient, &task.subject, &task.body)
                    .await
                    .map_err(|e| e.to_string());
                (task.assignment_id, task.kind, task.recipient, result)
            });
            // Kept only to attribute a panicked task
            in_flight.insert(handle.id(), identity);
        }

        let mut outcomes = Vec::with_capacity(in_flight.len());
        while let Some(joined) = set.join_next_with_id().await {
            let outcome = match joined {
                Ok((id, (assignment_id, kind, recipient, result))) => {
                    in_flight.remove(&id);
                    DeliveryOutcome {
                        assignment_id,
                        kind,
                        recipient,
                        result,
                    }
                }
                Err(e) => {
                    let Some((assignment_id, kind, recipient)) = in_flight.remove(&e.id()) else {
                        tracing::error!(error = %e, "Send task failed with unknown id");
                        continue;
                    };
                    DeliveryOutcome {
                        assignment_id,
                        kind,
                        recipient,
                        result: Err(format!("send task aborted: {}", e)),
                    }
                }
            };

            if let Err(error) = &outcome.result {
                tracing::warn!(
                    assignment_id = %outcome.assignment_id,
                    kind = %outcome.kind,
                    recipient = %outcome.recipient,
                    error = %error,
                    "Reminder send failed"
                );
            }
            outcomes.push(outcome);
        }

        outcomes
    }
}
