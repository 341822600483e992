//! SQLite-backed task writes for the webhook receiver.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use focusboard_core::TaskRepository;
use focusboard_domain::{Result, Task, TaskFromIssue};
use rusqlite::params;
use tokio::task;
use uuid::Uuid;

use super::connection_repository::timestamp_to_datetime;
use super::manager::{map_sql_error, DbManager};
use super::map_join_error;

/// SQLite-backed task repository.
pub struct SqliteTaskRepository {
    db: Arc<DbManager>,
}

impl SqliteTaskRepository {
    /// Create a new repository with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert_from_issue(&self, task: TaskFromIssue) -> Result<Task> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Task> {
            let conn = db.get_connection()?;
            let id = Uuid::new_v4();
            let now = Utc::now().timestamp();

            conn.execute(
                "INSERT INTO tasks
                    (id, user_id, title, completed, category, priority,
                     github_issue_url, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7)",
                params![
                    id.to_string(),
                    task.user_id,
                    task.title,
                    task.category.as_str(),
                    task.priority.as_str(),
                    task.github_issue_url,
                    now
                ],
            )
            .map_err(map_sql_error)?;

            Ok(Task {
                id,
                user_id: task.user_id,
                title: task.title,
                completed: false,
                category: task.category,
                priority: task.priority,
                github_issue_url: Some(task.github_issue_url),
                created_at: timestamp_to_datetime(now),
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn complete_by_issue_url(&self, user_id: &str, github_issue_url: &str) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        let github_issue_url = github_issue_url.to_string();

        task::spawn_blocking(move || -> Result<usize> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE tasks SET completed = 1
                 WHERE user_id = ?1 AND github_issue_url = ?2 AND completed = 0",
                params![user_id, github_issue_url],
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}
