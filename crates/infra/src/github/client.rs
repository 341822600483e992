//! GitHub HTTP client
//!
//! Implements the `GitHubGateway` port against the OAuth token endpoint
//! and the REST API. Base URLs come from configuration so tests and
//! staging can point at a mock server.
//!
//! The token endpoint reports failures as HTTP 200 with an `error`
//! field in the body, so success is decided on the payload, not the
//! status code.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use focusboard_core::{GitHubGateway, IssueEntry};
use focusboard_domain::{
    ExchangedTokens, FocusboardError, GitHubConfig, GitHubIdentity, Repository, Result,
};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("focusboard/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PAGE_SIZE: u32 = 100;

/// GitHub HTTP client.
pub struct GitHubApiClient {
    http: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    api_base_url: String,
}

impl GitHubApiClient {
    /// Create a client from the GitHub configuration.
    ///
    /// # Errors
    /// [`FocusboardError::Internal`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FocusboardError::Internal(format!("http client init failed: {e}")))?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: config.token_url(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_api(&self, path: &str, access_token: &str) -> Result<Response> {
        let url = format!("{}{path}", self.api_base_url);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("token {access_token}"))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(map_request_error)?;

        check_api_status(response, path).await
    }
}

#[async_trait]
impl GitHubGateway for GitHubApiClient {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ExchangedTokens> {
        debug!("requesting token from provider");
        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "client_id": self.client_id,
                "client_secret": self.client_secret,
                "code": code,
                "redirect_uri": redirect_uri,
            }))
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(FocusboardError::Network(format!(
                "token endpoint returned {status}"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| FocusboardError::Network(format!("malformed token response: {e}")))?;

        if let Some(error) = body.error {
            warn!(error, "provider rejected authorization code");
            return Err(FocusboardError::Auth(format!("token exchange failed: {error}")));
        }

        let access_token = body.access_token.ok_or_else(|| {
            FocusboardError::Auth("token response carried no access token".to_string())
        })?;

        Ok(ExchangedTokens { access_token, refresh_token: body.refresh_token })
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<GitHubIdentity> {
        let response = self.get_api("/user", access_token).await?;
        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| FocusboardError::Network(format!("malformed user response: {e}")))?;

        Ok(GitHubIdentity { login: user.login, id: user.id })
    }

    async fn list_repositories(&self, access_token: &str) -> Result<Vec<Repository>> {
        let path = format!("/user/repos?sort=updated&per_page={PAGE_SIZE}");
        let response = self.get_api(&path, access_token).await?;
        let repos: Vec<RepositoryResponse> = response
            .json()
            .await
            .map_err(|e| FocusboardError::Network(format!("malformed repo listing: {e}")))?;

        Ok(repos.into_iter().map(RepositoryResponse::into_repository).collect())
    }

    async fn list_issues(
        &self,
        access_token: &str,
        owner: &str,
        name: &str,
    ) -> Result<Vec<IssueEntry>> {
        let path = format!("/repos/{owner}/{name}/issues?state=open&sort=updated&per_page={PAGE_SIZE}");
        let response = self.get_api(&path, access_token).await?;
        let issues: Vec<IssueResponse> = response
            .json()
            .await
            .map_err(|e| FocusboardError::Network(format!("malformed issue listing: {e}")))?;

        Ok(issues.into_iter().map(IssueResponse::into_entry).collect())
    }
}

async fn check_api_status(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|_| "unreadable body".to_string());
    warn!(%status, path, "api request failed");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(FocusboardError::Auth(format!("api rejected token ({status})")))
        }
        StatusCode::NOT_FOUND => Err(FocusboardError::NotFound(format!("{path} not found"))),
        _ => Err(FocusboardError::Network(format!("api error ({status}): {body}"))),
    }
}

fn map_request_error(err: reqwest::Error) -> FocusboardError {
    if err.is_timeout() {
        FocusboardError::Network("request timed out".to_string())
    } else {
        FocusboardError::Network(format!("request failed: {err}"))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    id: i64,
    name: String,
    full_name: String,
    owner: OwnerResponse,
    html_url: String,
    description: Option<String>,
    private: bool,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

impl RepositoryResponse {
    fn into_repository(self) -> Repository {
        Repository {
            id: self.id,
            name: self.name,
            full_name: self.full_name,
            owner: self.owner.login,
            html_url: self.html_url,
            description: self.description,
            is_private: self.private,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    id: i64,
    number: i64,
    title: String,
    html_url: String,
    state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pull_request: Option<serde_json::Value>,
}

impl IssueResponse {
    fn into_entry(self) -> IssueEntry {
        IssueEntry {
            id: self.id,
            number: self.number,
            title: self.title,
            html_url: self.html_url,
            state: self.state,
            created_at: self.created_at,
            updated_at: self.updated_at,
            pull_request: self.pull_request.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> GitHubApiClient {
        GitHubApiClient::new(&GitHubConfig {
            client_id: "client123".to_string(),
            client_secret: "secret456".to_string(),
            oauth_base_url: server.uri(),
            api_base_url: server.uri(),
            allow_anonymous: false,
        })
        .expect("client built")
    }

    #[tokio::test]
    async fn exchange_code_posts_credentials_and_parses_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/access_token"))
            .and(header("accept", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "client_id": "client123",
                "code": "XYZ",
                "redirect_uri": "https://app.example/github",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok_1",
                "token_type": "bearer",
                "scope": "repo"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let tokens = client
            .exchange_code("XYZ", "https://app.example/github")
            .await
            .expect("exchange succeeded");

        assert_eq!(tokens.access_token, "tok_1");
        assert!(tokens.refresh_token.is_none());
    }

    #[tokio::test]
    async fn exchange_code_surfaces_provider_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.exchange_code("expired", "https://app.example/github").await;

        match result {
            Err(FocusboardError::Auth(message)) => {
                assert!(message.contains("bad_verification_code"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_identity_sends_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "token tok_1"))
            .and(header("accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "id": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let identity = client.fetch_identity("tok_1").await.expect("identity fetched");

        assert_eq!(identity.login, "octocat");
        assert_eq!(identity.id, 1);
    }

    #[tokio::test]
    async fn rejected_token_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.fetch_identity("revoked").await;

        assert!(matches!(result, Err(FocusboardError::Auth(_))));
    }

    #[tokio::test]
    async fn list_repositories_maps_owner_and_visibility() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("sort", "updated"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 42,
                "name": "widgets",
                "full_name": "octocat/widgets",
                "owner": { "login": "octocat" },
                "html_url": "https://github.com/octocat/widgets",
                "description": null,
                "private": true
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let repos = client.list_repositories("tok_1").await.expect("repos listed");

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].owner, "octocat");
        assert!(repos[0].is_private);
    }

    #[tokio::test]
    async fn list_issues_flags_pull_request_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/widgets/issues"))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1,
                    "number": 1,
                    "title": "A real issue",
                    "html_url": "https://github.com/octocat/widgets/issues/1",
                    "state": "open",
                    "created_at": "2026-01-01T00:00:00Z",
                    "updated_at": "2026-01-02T00:00:00Z"
                },
                {
                    "id": 2,
                    "number": 2,
                    "title": "A pull request",
                    "html_url": "https://github.com/octocat/widgets/pull/2",
                    "state": "open",
                    "created_at": "2026-01-01T00:00:00Z",
                    "updated_at": "2026-01-02T00:00:00Z",
                    "pull_request": { "url": "https://api.github.com/repos/octocat/widgets/pulls/2" }
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let entries = client.list_issues("tok_1", "octocat", "widgets").await.expect("issues listed");

        assert_eq!(entries.len(), 2);
        assert!(!entries[0].pull_request);
        assert!(entries[1].pull_request);
    }

    #[tokio::test]
    async fn missing_repository_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/gone/issues"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Not Found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.list_issues("tok_1", "octocat", "gone").await;

        assert!(matches!(result, Err(FocusboardError::NotFound(_))));
    }
}
