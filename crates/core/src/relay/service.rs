//! Relay orchestration - proxies GitHub reads and tracking writes
//!
//! Every operation acts on the caller's stored connection (or, for the
//! listing endpoints, an explicitly supplied token in anonymous mode).
//! A missing connection is reported as the not-connected class so the
//! UI can prompt a reconnect instead of a retry.

use std::sync::Arc;

use focusboard_domain::{
    ConnectionSummary, FocusboardError, Issue, Repository, Result, TrackingPreference,
    TrackingUpsert,
};
use tracing::debug;

use crate::ports::{ConnectionRepository, GitHubGateway, TrackingRepository};

/// Relay service
pub struct RelayService {
    gateway: Arc<dyn GitHubGateway>,
    connections: Arc<dyn ConnectionRepository>,
    tracking: Arc<dyn TrackingRepository>,
}

impl RelayService {
    /// Create a new relay service.
    pub fn new(
        gateway: Arc<dyn GitHubGateway>,
        connections: Arc<dyn ConnectionRepository>,
        tracking: Arc<dyn TrackingRepository>,
    ) -> Self {
        Self { gateway, connections, tracking }
    }

    /// List the caller's repositories.
    ///
    /// Accepts either a verified caller identity (token looked up from
    /// the connection store) or an explicit access token from the
    /// anonymous session-only mode.
    ///
    /// # Errors
    /// [`FocusboardError::Auth`] when neither is supplied,
    /// [`FocusboardError::NotConnected`] when the user has no stored
    /// connection.
    pub async fn repositories(
        &self,
        user_id: Option<&str>,
        access_token: Option<String>,
    ) -> Result<Vec<Repository>> {
        let token = self.resolve_token(user_id, access_token).await?;
        self.gateway.list_repositories(&token).await
    }

    /// List open issues for a repository, excluding pull requests.
    ///
    /// The upstream listing conflates issues and pull requests; entries
    /// carrying a pull-request linkage are dropped here.
    pub async fn issues(
        &self,
        user_id: Option<&str>,
        access_token: Option<String>,
        owner: &str,
        name: &str,
    ) -> Result<Vec<Issue>> {
        let token = self.resolve_token(user_id, access_token).await?;
        let entries = self.gateway.list_issues(&token, owner, name).await?;

        let total = entries.len();
        let issues: Vec<Issue> =
            entries.into_iter().filter(|entry| !entry.pull_request).map(Issue::from).collect();
        debug!(total, kept = issues.len(), owner, name, "filtered issue listing");

        Ok(issues)
    }

    /// Upsert a tracking preference for the caller.
    pub async fn track(&self, user_id: &str, upsert: TrackingUpsert) -> Result<TrackingPreference> {
        self.tracking.upsert(user_id, upsert).await
    }

    /// List the caller's tracked repositories.
    pub async fn tracked(&self, user_id: &str) -> Result<Vec<TrackingPreference>> {
        self.tracking.list_for_user(user_id).await
    }

    /// Look up the caller's connection, token excluded.
    pub async fn connection(&self, user_id: &str) -> Result<Option<ConnectionSummary>> {
        let connection = self.connections.find_by_user(user_id).await?;
        Ok(connection.as_ref().map(ConnectionSummary::from))
    }

    /// Delete the caller's connection. Returns whether one existed.
    pub async fn disconnect(&self, user_id: &str) -> Result<bool> {
        self.connections.delete_by_user(user_id).await
    }

    async fn resolve_token(
        &self,
        user_id: Option<&str>,
        access_token: Option<String>,
    ) -> Result<String> {
        if let Some(token) = access_token {
            return Ok(token);
        }

        let user_id = user_id
            .ok_or_else(|| FocusboardError::Auth("authentication required".to_string()))?;

        let connection = self
            .connections
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| FocusboardError::NotConnected(user_id.to_string()))?;

        Ok(connection.access_token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use focusboard_domain::{Connection, ConnectionUpsert, ExchangedTokens, GitHubIdentity};
    use uuid::Uuid;

    use super::*;
    use crate::ports::IssueEntry;

    struct FixtureGateway {
        issues: Vec<IssueEntry>,
    }

    #[async_trait]
    impl GitHubGateway for FixtureGateway {
        async fn exchange_code(
            &self,
            _code: &str,
            _redirect_uri: &str,
        ) -> Result<ExchangedTokens> {
            Err(FocusboardError::Internal("not used".to_string()))
        }

        async fn fetch_identity(&self, _access_token: &str) -> Result<GitHubIdentity> {
            Err(FocusboardError::Internal("not used".to_string()))
        }

        async fn list_repositories(&self, access_token: &str) -> Result<Vec<Repository>> {
            assert_eq!(access_token, "tok_1");
            Ok(vec![Repository {
                id: 42,
                name: "widgets".to_string(),
                full_name: "octocat/widgets".to_string(),
                owner: "octocat".to_string(),
                html_url: "https://github.example/octocat/widgets".to_string(),
                description: None,
                is_private: false,
            }])
        }

        async fn list_issues(
            &self,
            _access_token: &str,
            _owner: &str,
            _name: &str,
        ) -> Result<Vec<IssueEntry>> {
            Ok(self.issues.clone())
        }
    }

    #[derive(Default)]
    struct MemoryConnections {
        rows: Mutex<Vec<Connection>>,
    }

    impl MemoryConnections {
        fn with_connection(user_id: &str) -> Self {
            let now = Utc::now();
            Self {
                rows: Mutex::new(vec![Connection {
                    id: Uuid::new_v4(),
                    user_id: user_id.to_string(),
                    access_token: "tok_1".to_string(),
                    refresh_token: None,
                    github_username: Some("octocat".to_string()),
                    created_at: now,
                    updated_at: now,
                }]),
            }
        }
    }

    #[async_trait]
    impl ConnectionRepository for MemoryConnections {
        async fn upsert(&self, _upsert: ConnectionUpsert) -> Result<Connection> {
            Err(FocusboardError::Internal("not used".to_string()))
        }

        async fn find_by_user(&self, user_id: &str) -> Result<Option<Connection>> {
            Ok(self.rows.lock().unwrap().iter().find(|c| c.user_id == user_id).cloned())
        }

        async fn delete_by_user(&self, user_id: &str) -> Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.user_id != user_id);
            Ok(rows.len() != before)
        }
    }

    #[derive(Default)]
    struct MemoryTracking {
        rows: Mutex<Vec<TrackingPreference>>,
    }

    #[async_trait]
    impl TrackingRepository for MemoryTracking {
        async fn upsert(
            &self,
            user_id: &str,
            upsert: TrackingUpsert,
        ) -> Result<TrackingPreference> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(existing) = rows
                .iter_mut()
                .find(|p| p.user_id == user_id && p.repo_id == upsert.repo_id)
            {
                existing.track_issues = upsert.track_issues;
                existing.track_pull_requests = upsert.track_pull_requests;
                return Ok(existing.clone());
            }
            let preference = TrackingPreference {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                repo_id: upsert.repo_id,
                repo_owner: upsert.repo_owner,
                repo_name: upsert.repo_name,
                track_issues: upsert.track_issues,
                track_pull_requests: upsert.track_pull_requests,
            };
            rows.push(preference.clone());
            Ok(preference)
        }

        async fn list_for_user(&self, user_id: &str) -> Result<Vec<TrackingPreference>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn issue_trackers(&self, _owner: &str, _name: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn issue_entry(id: i64, pull_request: bool) -> IssueEntry {
        let now = Utc::now();
        IssueEntry {
            id,
            number: id,
            title: format!("issue {id}"),
            html_url: format!("https://github.example/octocat/widgets/issues/{id}"),
            state: "open".to_string(),
            created_at: now,
            updated_at: now,
            pull_request,
        }
    }

    fn service(connections: MemoryConnections, issues: Vec<IssueEntry>) -> RelayService {
        RelayService::new(
            Arc::new(FixtureGateway { issues }),
            Arc::new(connections),
            Arc::new(MemoryTracking::default()),
        )
    }

    #[tokio::test]
    async fn issues_exclude_pull_requests() {
        let mut entries: Vec<IssueEntry> = (1..=5).map(|id| issue_entry(id, false)).collect();
        entries.extend((6..=8).map(|id| issue_entry(id, true)));

        let relay = service(MemoryConnections::with_connection("user-a"), entries);
        let issues = relay
            .issues(Some("user-a"), None, "octocat", "widgets")
            .await
            .expect("listing succeeded");

        assert_eq!(issues.len(), 5);
        assert!(issues.iter().all(|issue| issue.id <= 5));
    }

    #[tokio::test]
    async fn missing_connection_is_not_connected() {
        let relay = service(MemoryConnections::default(), Vec::new());
        let result = relay.repositories(Some("user-a"), None).await;

        assert!(matches!(result, Err(FocusboardError::NotConnected(_))));
    }

    #[tokio::test]
    async fn missing_identity_and_token_is_auth_error() {
        let relay = service(MemoryConnections::default(), Vec::new());
        let result = relay.repositories(None, None).await;

        assert!(matches!(result, Err(FocusboardError::Auth(_))));
    }

    #[tokio::test]
    async fn explicit_token_bypasses_connection_lookup() {
        let relay = service(MemoryConnections::default(), Vec::new());
        let repos = relay
            .repositories(None, Some("tok_1".to_string()))
            .await
            .expect("listing succeeded");

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name, "octocat/widgets");
    }

    #[tokio::test]
    async fn track_upserts_on_repeat_requests() {
        let relay = service(MemoryConnections::with_connection("user-a"), Vec::new());

        let upsert = TrackingUpsert {
            repo_id: 42,
            repo_owner: "octocat".to_string(),
            repo_name: "widgets".to_string(),
            track_issues: true,
            track_pull_requests: false,
        };
        let first = relay.track("user-a", upsert.clone()).await.expect("first track");

        let second = relay
            .track(
                "user-a",
                TrackingUpsert { track_pull_requests: true, ..upsert },
            )
            .await
            .expect("second track");

        assert_eq!(first.id, second.id, "repeat track updates the same preference");
        assert!(second.track_pull_requests);
        assert_eq!(relay.tracked("user-a").await.expect("listing").len(), 1);
    }

    #[tokio::test]
    async fn connection_summary_omits_token_and_disconnect_removes_row() {
        let relay = service(MemoryConnections::with_connection("user-a"), Vec::new());

        let summary = relay
            .connection("user-a")
            .await
            .expect("lookup succeeded")
            .expect("connection present");
        assert_eq!(summary.github_username.as_deref(), Some("octocat"));
        let serialized = serde_json::to_string(&summary).expect("serializable");
        assert!(!serialized.contains("tok_1"), "summary must not leak the token");

        assert!(relay.disconnect("user-a").await.expect("disconnect"));
        assert!(relay.connection("user-a").await.expect("lookup").is_none());
    }
}
