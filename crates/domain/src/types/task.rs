//! Task fields touched by the GitHub integration
//!
//! The full task model belongs to the productivity app; this core only
//! creates tasks from webhook events and completes them again, linked
//! through `github_issue_url`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task category labels shared with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Bug,
    Feature,
    Enhancement,
    Documentation,
    Other,
}

/// Task priority labels shared with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Enhancement => "enhancement",
            Self::Documentation => "documentation",
            Self::Other => "other",
        }
    }
}

impl TaskPriority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A task row as this core sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub completed: bool,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub github_issue_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task from a GitHub issue.
#[derive(Debug, Clone)]
pub struct TaskFromIssue {
    pub user_id: String,
    pub title: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub github_issue_url: String,
}
