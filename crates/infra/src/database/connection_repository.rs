//! SQLite-backed GitHub connection repository.
//!
//! One connection row per user, upserted on repeat authorizations. The
//! access token is stored server-side only; callers that must not see
//! it go through `ConnectionSummary`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use focusboard_core::ConnectionRepository;
use focusboard_domain::{Connection, ConnectionUpsert, FocusboardError, Result};
use rusqlite::{params, OptionalExtension};
use tokio::task;
use uuid::Uuid;

use super::manager::{map_sql_error, DbConnection, DbManager};
use super::map_join_error;

/// SQLite-backed connection repository.
pub struct SqliteConnectionRepository {
    db: Arc<DbManager>,
}

impl SqliteConnectionRepository {
    /// Create a new repository with the given database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConnectionRepository for SqliteConnectionRepository {
    async fn upsert(&self, upsert: ConnectionUpsert) -> Result<Connection> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Connection> {
            let conn = db.get_connection()?;
            upsert_connection(&conn, &upsert)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Connection>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<Option<Connection>> {
            let conn = db.get_connection()?;
            query_by_user(&conn, &user_id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute("DELETE FROM github_connections WHERE user_id = ?1", params![user_id])
                .map_err(map_sql_error)?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn upsert_connection(conn: &DbConnection, upsert: &ConnectionUpsert) -> Result<Connection> {
    let now = Utc::now().timestamp();
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO github_connections
            (id, user_id, access_token, refresh_token, github_username, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(user_id) DO UPDATE SET
            access_token = excluded.access_token,
            refresh_token = excluded.refresh_token,
            github_username = excluded.github_username,
            updated_at = excluded.updated_at",
        params![id, upsert.user_id, upsert.access_token, upsert.refresh_token, upsert.github_username, now],
    )
    .map_err(map_sql_error)?;

    // Read the row back: on conflict the original id and created_at
    // survive, which callers rely on.
    query_by_user(conn, &upsert.user_id)?.ok_or_else(|| {
        FocusboardError::Database("connection row missing after upsert".to_string())
    })
}

fn query_by_user(conn: &DbConnection, user_id: &str) -> Result<Option<Connection>> {
    conn.query_row(
        "SELECT id, user_id, access_token, refresh_token, github_username, created_at, updated_at
         FROM github_connections WHERE user_id = ?1",
        params![user_id],
        row_to_connection,
    )
    .optional()
    .map_err(map_sql_error)
}

fn row_to_connection(row: &rusqlite::Row<'_>) -> rusqlite::Result<Connection> {
    let id: String = row.get(0)?;
    Ok(Connection {
        id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::nil()),
        user_id: row.get(1)?,
        access_token: row.get(2)?,
        refresh_token: row.get(3)?,
        github_username: row.get(4)?,
        created_at: timestamp_to_datetime(row.get(5)?),
        updated_at: timestamp_to_datetime(row.get(6)?),
    })
}

pub(crate) fn timestamp_to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn setup() -> (SqliteConnectionRepository, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("connections.db");

        let mgr = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        mgr.run_migrations().expect("migrations run");

        (SqliteConnectionRepository::new(mgr), temp_dir)
    }

    fn sample_upsert(user_id: &str, token: &str) -> ConnectionUpsert {
        ConnectionUpsert {
            user_id: user_id.to_string(),
            access_token: token.to_string(),
            refresh_token: None,
            github_username: "octocat".to_string(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_then_find_round_trips() {
        let (repo, _dir) = setup().await;

        let stored = repo.upsert(sample_upsert("user-a", "tok_1")).await.expect("upsert");
        assert_eq!(stored.user_id, "user-a");
        assert_eq!(stored.github_username.as_deref(), Some("octocat"));

        let found = repo.find_by_user("user-a").await.expect("find").expect("row exists");
        assert_eq!(found.id, stored.id);
        assert_eq!(found.access_token, "tok_1");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn repeat_upsert_keeps_id_and_replaces_token() {
        let (repo, _dir) = setup().await;

        let first = repo.upsert(sample_upsert("user-a", "tok_1")).await.expect("first upsert");
        let second = repo.upsert(sample_upsert("user-a", "tok_2")).await.expect("second upsert");

        assert_eq!(first.id, second.id, "conflict must update, not insert");
        assert_eq!(second.access_token, "tok_2");
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_reports_whether_row_existed() {
        let (repo, _dir) = setup().await;

        repo.upsert(sample_upsert("user-a", "tok_1")).await.expect("upsert");

        assert!(repo.delete_by_user("user-a").await.expect("first delete"));
        assert!(!repo.delete_by_user("user-a").await.expect("second delete"));
        assert!(repo.find_by_user("user-a").await.expect("find").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn find_missing_user_is_none() {
        let (repo, _dir) = setup().await;

        assert!(repo.find_by_user("nobody").await.expect("find").is_none());
    }
}
