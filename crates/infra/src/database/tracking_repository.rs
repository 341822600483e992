//! SQLite-backed repository tracking preferences.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use focusboard_core::TrackingRepository;
use focusboard_domain::{FocusboardError, Result, TrackingPreference, TrackingUpsert};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use uuid::Uuid;

use super::manager::{map_sql_error, DbConnection, DbManager};
use super::map_join_error;

/// SQLite-backed tracking repository.
pub struct SqliteTrackingRepository {
    db: Arc<DbManager>,
}

impl SqliteTrackingRepository {
    /// Create a new repository with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrackingRepository for SqliteTrackingRepository {
    async fn upsert(&self, user_id: &str, upsert: TrackingUpsert) -> Result<TrackingPreference> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<TrackingPreference> {
            let conn = db.get_connection()?;
            upsert_preference(&conn, &user_id, &upsert)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<TrackingPreference>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Vec<TrackingPreference>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, user_id, repo_id, repo_owner, repo_name,
                            track_issues, track_pull_requests
                     FROM github_repos WHERE user_id = ?1
                     ORDER BY repo_owner, repo_name",
                )
                .map_err(map_sql_error)?;

            let rows = stmt
                .query_map(params![user_id], row_to_preference)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn issue_trackers(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<String>> {
        let db = Arc::clone(&self.db);
        let repo_owner = repo_owner.to_string();
        let repo_name = repo_name.to_string();

        task::spawn_blocking(move || -> Result<Vec<String>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT user_id FROM github_repos
                     WHERE repo_owner = ?1 AND repo_name = ?2 AND track_issues = 1",
                )
                .map_err(map_sql_error)?;

            let rows = stmt
                .query_map(params![repo_owner, repo_name], |row| row.get::<_, String>(0))
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn upsert_preference(
    conn: &DbConnection,
    user_id: &str,
    upsert: &TrackingUpsert,
) -> Result<TrackingPreference> {
    let now = Utc::now().timestamp();
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO github_repos
            (id, user_id, repo_id, repo_owner, repo_name,
             track_issues, track_pull_requests, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(user_id, repo_id) DO UPDATE SET
            repo_owner = excluded.repo_owner,
            repo_name = excluded.repo_name,
            track_issues = excluded.track_issues,
            track_pull_requests = excluded.track_pull_requests",
        params![
            id,
            user_id,
            upsert.repo_id,
            upsert.repo_owner,
            upsert.repo_name,
            upsert.track_issues,
            upsert.track_pull_requests,
            now
        ],
    )
    .map_err(map_sql_error)?;

    conn.query_row(
        "SELECT id, user_id, repo_id, repo_owner, repo_name,
                track_issues, track_pull_requests
         FROM github_repos WHERE user_id = ?1 AND repo_id = ?2",
        params![user_id, upsert.repo_id],
        row_to_preference,
    )
    .optional()
    .map_err(map_sql_error)?
    .ok_or_else(|| FocusboardError::Database("tracking row missing after upsert".to_string()))
}

fn row_to_preference(row: &rusqlite::Row<'_>) -> rusqlite::Result<TrackingPreference> {
    let id: String = row.get(0)?;
    Ok(TrackingPreference {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        user_id: row.get(1)?,
        repo_id: row.get(2)?,
        repo_owner: row.get(3)?,
        repo_name: row.get(4)?,
        track_issues: row.get::<_, i64>(5)? != 0,
        track_pull_requests: row.get::<_, i64>(6)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn setup() -> (SqliteTrackingRepository, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("tracking.db");

        let mgr = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        mgr.run_migrations().expect("migrations run");

        (SqliteTrackingRepository::new(mgr), temp_dir)
    }

    fn widgets(track_issues: bool) -> TrackingUpsert {
        TrackingUpsert {
            repo_id: 42,
            repo_owner: "octocat".to_string(),
            repo_name: "widgets".to_string(),
            track_issues,
            track_pull_requests: false,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_is_keyed_on_user_and_repo() {
        let (repo, _dir) = setup().await;

        let first = repo.upsert("user-a", widgets(true)).await.expect("first upsert");
        let second = repo.upsert("user-a", widgets(false)).await.expect("second upsert");

        assert_eq!(first.id, second.id);
        assert!(!second.track_issues);
        assert_eq!(repo.list_for_user("user-a").await.expect("list").len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn issue_trackers_filters_on_flag_and_coordinates() {
        let (repo, _dir) = setup().await;

        repo.upsert("user-a", widgets(true)).await.expect("user-a tracks");
        repo.upsert("user-b", widgets(true)).await.expect("user-b tracks");
        repo.upsert("user-c", widgets(false)).await.expect("user-c opted out of issues");

        let mut trackers = repo.issue_trackers("octocat", "widgets").await.expect("lookup");
        trackers.sort();
        assert_eq!(trackers, vec!["user-a".to_string(), "user-b".to_string()]);

        let other = repo.issue_trackers("octocat", "gadgets").await.expect("lookup");
        assert!(other.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_is_scoped_to_the_user() {
        let (repo, _dir) = setup().await;

        repo.upsert("user-a", widgets(true)).await.expect("upsert");

        assert_eq!(repo.list_for_user("user-a").await.expect("list").len(), 1);
        assert!(repo.list_for_user("user-b").await.expect("list").is_empty());
    }
}
