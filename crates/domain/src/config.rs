//! Configuration structures
//!
//! Typed configuration for the connect service. Values are loaded from
//! the environment by `focusboard-infra`; this crate only defines the
//! shapes and their defaults.

use serde::{Deserialize, Serialize};

/// GitHub OAuth endpoints used when no override is configured.
pub const DEFAULT_GITHUB_OAUTH_URL: &str = "https://github.com/login/oauth";
/// GitHub REST API base used when no override is configured.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
/// OAuth scope requested during authorization.
pub const GITHUB_OAUTH_SCOPE: &str = "repo";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub github: GitHubConfig,
    pub webhook: WebhookConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Hosted auth service used to resolve bearer session tokens into
    /// user ids. When absent, every caller is treated as anonymous.
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

/// GitHub OAuth application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// OAuth app client id.
    pub client_id: String,

    /// OAuth app client secret. Server-side only; never sent to the
    /// browser or logged.
    pub client_secret: String,

    /// Base URL for the authorize/token endpoints. Overridable so tests
    /// and staging can point at a mock server.
    #[serde(default = "default_oauth_url")]
    pub oauth_base_url: String,

    /// Base URL for the REST API (identity, repositories, issues).
    #[serde(default = "default_api_url")]
    pub api_base_url: String,

    /// Whether an exchange without a verified caller identity is
    /// allowed. When enabled nothing is persisted and the token is
    /// returned to the caller; default off.
    #[serde(default)]
    pub allow_anonymous: bool,
}

impl GitHubConfig {
    /// Authorization endpoint (`{oauth_base_url}/authorize`).
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.oauth_base_url.trim_end_matches('/'))
    }

    /// Token exchange endpoint (`{oauth_base_url}/access_token`).
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/access_token", self.oauth_base_url.trim_end_matches('/'))
    }
}

/// Webhook receiver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret GitHub signs event bodies with.
    pub secret: String,
}

/// SQLite storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

/// Hosted auth service settings for bearer-session verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth service.
    pub url: String,
    /// Service credential presented alongside the user's bearer token.
    pub service_key: String,
}

fn default_oauth_url() -> String {
    DEFAULT_GITHUB_OAUTH_URL.to_string()
}

fn default_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_pool_size() -> u32 {
    4
}

fn default_listen_addr() -> String {
    "127.0.0.1:8787".to_string()
}
