//! GitHub connection and relay types
//!
//! The Connection is the only record the OAuth core owns; Repository
//! and Issue are read-only projections of GitHub API responses into the
//! app's own shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's stored GitHub OAuth connection.
///
/// At most one row exists per user; reconnecting updates the row in
/// place. The access token never leaves the server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub github_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Connection fields safe to show to the owning user.
///
/// Deliberately excludes both tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub id: Uuid,
    pub github_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Connection> for ConnectionSummary {
    fn from(connection: &Connection) -> Self {
        Self {
            id: connection.id,
            github_username: connection.github_username.clone(),
            created_at: connection.created_at,
            updated_at: connection.updated_at,
        }
    }
}

/// Input for creating or refreshing a Connection.
#[derive(Debug, Clone)]
pub struct ConnectionUpsert {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub github_username: String,
}

/// Token pair returned by the GitHub token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Identity fetched from the GitHub user endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIdentity {
    pub login: String,
    pub id: i64,
}

/// A repository the user chose to track, with per-kind toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingPreference {
    pub id: Uuid,
    pub user_id: String,
    pub repo_id: i64,
    pub repo_owner: String,
    pub repo_name: String,
    pub track_issues: bool,
    pub track_pull_requests: bool,
}

/// Input for upserting a tracking preference, keyed on (user, repo_id).
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingUpsert {
    pub repo_id: i64,
    pub repo_owner: String,
    pub repo_name: String,
    pub track_issues: bool,
    pub track_pull_requests: bool,
}

/// App-shaped projection of a GitHub repository entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub owner: String,
    pub html_url: String,
    pub description: Option<String>,
    pub is_private: bool,
}

/// App-shaped projection of a GitHub issue.
///
/// Pull requests are filtered out before this type is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
