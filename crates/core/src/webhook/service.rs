//! Webhook fan-out - turns issue events into task writes
//!
//! Signature verification happens at the transport layer before any
//! payload reaches this service; everything here runs on authenticated
//! deliveries only.

use std::sync::Arc;

use focusboard_domain::{IssuesEvent, Result, TaskCategory, TaskFromIssue, TaskPriority};
use tracing::{debug, info, warn};

use crate::ports::{TaskRepository, TrackingRepository};

/// What became of a delivery.
///
/// Unhandled event types and actions are `Ignored`, which the transport
/// still acknowledges with success so the sender does not retry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDisposition {
    Processed { tasks_created: usize, tasks_completed: usize },
    Ignored,
}

/// Webhook processor
pub struct WebhookProcessor {
    tracking: Arc<dyn TrackingRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl WebhookProcessor {
    /// Create a new webhook processor.
    pub fn new(tracking: Arc<dyn TrackingRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tracking, tasks }
    }

    /// Process one delivery.
    ///
    /// `event` is the value of the `x-github-event` header. Only
    /// `issues` events with an `opened` or `closed` action mutate
    /// anything; every other delivery is ignored.
    ///
    /// # Errors
    /// [`FocusboardError::InvalidInput`](focusboard_domain::FocusboardError::InvalidInput)
    /// when an `issues` payload does not parse,
    /// [`FocusboardError::Database`](focusboard_domain::FocusboardError::Database)
    /// when a task write fails.
    pub async fn process(&self, event: &str, payload: &[u8]) -> Result<WebhookDisposition> {
        if event != "issues" {
            debug!(event, "ignoring unhandled event type");
            return Ok(WebhookDisposition::Ignored);
        }

        let parsed: IssuesEvent = serde_json::from_slice(payload).map_err(|e| {
            focusboard_domain::FocusboardError::InvalidInput(format!(
                "malformed issues payload: {e}"
            ))
        })?;

        match parsed.action.as_str() {
            "opened" => self.issue_opened(&parsed).await,
            "closed" => self.issue_closed(&parsed).await,
            other => {
                debug!(action = other, "ignoring unhandled issues action");
                Ok(WebhookDisposition::Ignored)
            }
        }
    }

    /// Create a task for every user tracking issues on the repository.
    async fn issue_opened(&self, event: &IssuesEvent) -> Result<WebhookDisposition> {
        let trackers = self
            .tracking
            .issue_trackers(&event.repository.owner.login, &event.repository.name)
            .await?;

        if trackers.is_empty() {
            debug!(
                repo = %event.repository.name,
                issue = event.issue.number,
                "no trackers for opened issue"
            );
            return Ok(WebhookDisposition::Processed { tasks_created: 0, tasks_completed: 0 });
        }

        let mut tasks_created = 0;
        for user_id in trackers {
            self.tasks
                .insert_from_issue(TaskFromIssue {
                    user_id,
                    title: format!("GitHub Issue: {}", event.issue.title),
                    category: TaskCategory::Bug,
                    priority: TaskPriority::Medium,
                    github_issue_url: event.issue.html_url.clone(),
                })
                .await?;
            tasks_created += 1;
        }

        info!(
            repo = %event.repository.name,
            issue = event.issue.number,
            tasks_created,
            "fanned out opened issue"
        );
        Ok(WebhookDisposition::Processed { tasks_created, tasks_completed: 0 })
    }

    /// Complete the linked tasks of every tracker of the repository.
    async fn issue_closed(&self, event: &IssuesEvent) -> Result<WebhookDisposition> {
        let trackers = self
            .tracking
            .issue_trackers(&event.repository.owner.login, &event.repository.name)
            .await?;

        let mut tasks_completed = 0;
        for user_id in trackers {
            tasks_completed += self
                .tasks
                .complete_by_issue_url(&user_id, &event.issue.html_url)
                .await?;
        }

        if tasks_completed == 0 {
            // Normal when the issue predates tracking or the task was
            // deleted in the app.
            warn!(
                repo = %event.repository.name,
                issue = event.issue.number,
                "closed issue matched no open tasks"
            );
        } else {
            info!(
                repo = %event.repository.name,
                issue = event.issue.number,
                tasks_completed,
                "completed tasks for closed issue"
            );
        }
        Ok(WebhookDisposition::Processed { tasks_created: 0, tasks_completed })
    }
}
