//! Port interfaces for the GitHub connect services
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use focusboard_domain::{
    Connection, ConnectionUpsert, ExchangedTokens, GitHubIdentity, Issue, Repository, Result, Task,
    TaskFromIssue, TrackingPreference, TrackingUpsert,
};

/// Issue entry as returned by the GitHub list endpoint.
///
/// The upstream API conflates issues and pull requests in one listing;
/// `pull_request` records whether the entry carried a pull-request
/// linkage so the relay can filter it out.
#[derive(Debug, Clone)]
pub struct IssueEntry {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub html_url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pull_request: bool,
}

impl From<IssueEntry> for Issue {
    fn from(entry: IssueEntry) -> Self {
        Self {
            id: entry.id,
            number: entry.number,
            title: entry.title,
            html_url: entry.html_url,
            state: entry.state,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Trait for talking to GitHub (token endpoint and REST API)
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// Exchange an authorization code for tokens. The redirect URI must
    /// equal the one used in the authorization request.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ExchangedTokens>;

    /// Fetch the authenticated user's identity.
    async fn fetch_identity(&self, access_token: &str) -> Result<GitHubIdentity>;

    /// List the authenticated user's repositories (bounded page size,
    /// best effort).
    async fn list_repositories(&self, access_token: &str) -> Result<Vec<Repository>>;

    /// List open issues for a repository, pull-request entries included.
    async fn list_issues(
        &self,
        access_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<Vec<IssueEntry>>;
}

/// Trait for persisting GitHub connections
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Insert or update the single connection row for a user,
    /// refreshing `updated_at`.
    async fn upsert(&self, upsert: ConnectionUpsert) -> Result<Connection>;

    /// Look up a user's connection.
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Connection>>;

    /// Delete a user's connection. Returns whether a row existed.
    async fn delete_by_user(&self, user_id: &str) -> Result<bool>;
}

/// Trait for persisting repository tracking preferences
#[async_trait]
pub trait TrackingRepository: Send + Sync {
    /// Insert or update a preference keyed on (user, repo_id).
    async fn upsert(&self, user_id: &str, upsert: TrackingUpsert) -> Result<TrackingPreference>;

    /// List a user's tracked repositories.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<TrackingPreference>>;

    /// Ids of users tracking issues on the given repository.
    async fn issue_trackers(&self, repo_owner: &str, repo_name: &str) -> Result<Vec<String>>;
}

/// Trait for the task writes the webhook receiver performs
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a task from a GitHub issue.
    async fn insert_from_issue(&self, task: TaskFromIssue) -> Result<Task>;

    /// Mark tasks linked to an issue URL complete. Returns the number
    /// of rows updated.
    async fn complete_by_issue_url(&self, user_id: &str, github_issue_url: &str) -> Result<usize>;
}

/// Trait for resolving bearer session tokens into user ids
///
/// Mirrors the hosted platform's auth check: an invalid or unknown
/// token resolves to `None` (anonymous) rather than an error, so the
/// exchange can still run in anonymous mode when that is enabled.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, bearer_token: &str) -> Result<Option<String>>;
}
