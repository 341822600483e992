//! Configuration loader
//!
//! Loads application configuration from environment variables. A
//! `.env` file is honoured when present (loaded by the binary before
//! this runs).
//!
//! ## Environment Variables
//!
//! Required:
//! - `FOCUSBOARD_GITHUB_CLIENT_ID`: OAuth app client id
//! - `FOCUSBOARD_GITHUB_CLIENT_SECRET`: OAuth app client secret
//! - `FOCUSBOARD_WEBHOOK_SECRET`: webhook signing secret
//! - `FOCUSBOARD_DB_PATH`: SQLite database file path
//!
//! Optional:
//! - `FOCUSBOARD_GITHUB_OAUTH_URL`: OAuth endpoint base override
//! - `FOCUSBOARD_GITHUB_API_URL`: REST API base override
//! - `FOCUSBOARD_ALLOW_ANONYMOUS`: enable session-only exchanges
//! - `FOCUSBOARD_DB_POOL_SIZE`: connection pool size
//! - `FOCUSBOARD_LISTEN_ADDR`: HTTP listener address
//! - `FOCUSBOARD_AUTH_URL` + `FOCUSBOARD_SERVICE_KEY`: hosted auth
//!   service for bearer-session verification (both or neither)

use focusboard_domain::{
    AuthConfig, Config, DatabaseConfig, FocusboardError, GitHubConfig, Result, ServerConfig,
    WebhookConfig, DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_OAUTH_URL,
};

const ENV_CLIENT_ID: &str = "FOCUSBOARD_GITHUB_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "FOCUSBOARD_GITHUB_CLIENT_SECRET";
const ENV_WEBHOOK_SECRET: &str = "FOCUSBOARD_WEBHOOK_SECRET";
const ENV_DB_PATH: &str = "FOCUSBOARD_DB_PATH";
const ENV_OAUTH_URL: &str = "FOCUSBOARD_GITHUB_OAUTH_URL";
const ENV_API_URL: &str = "FOCUSBOARD_GITHUB_API_URL";
const ENV_ALLOW_ANONYMOUS: &str = "FOCUSBOARD_ALLOW_ANONYMOUS";
const ENV_DB_POOL_SIZE: &str = "FOCUSBOARD_DB_POOL_SIZE";
const ENV_LISTEN_ADDR: &str = "FOCUSBOARD_LISTEN_ADDR";
const ENV_AUTH_URL: &str = "FOCUSBOARD_AUTH_URL";
const ENV_SERVICE_KEY: &str = "FOCUSBOARD_SERVICE_KEY";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// Load configuration from the environment.
///
/// # Errors
/// Returns `FocusboardError::Config` naming every missing required
/// variable, so a misconfigured deployment fails once with a complete
/// list instead of one variable at a time.
pub fn load() -> Result<Config> {
    let config = load_from_env()?;
    tracing::info!("configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables.
pub fn load_from_env() -> Result<Config> {
    let mut missing = Vec::new();

    let client_id = require(ENV_CLIENT_ID, &mut missing);
    let client_secret = require(ENV_CLIENT_SECRET, &mut missing);
    let webhook_secret = require(ENV_WEBHOOK_SECRET, &mut missing);
    let db_path = require(ENV_DB_PATH, &mut missing);

    if !missing.is_empty() {
        return Err(FocusboardError::Config(format!(
            "missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    let pool_size = match std::env::var(ENV_DB_POOL_SIZE) {
        Ok(raw) => raw.parse::<u32>().map_err(|e| {
            FocusboardError::Config(format!("invalid {ENV_DB_POOL_SIZE}: {e}"))
        })?,
        Err(_) => DEFAULT_POOL_SIZE,
    };

    Ok(Config {
        github: GitHubConfig {
            client_id,
            client_secret,
            oauth_base_url: std::env::var(ENV_OAUTH_URL)
                .unwrap_or_else(|_| DEFAULT_GITHUB_OAUTH_URL.to_string()),
            api_base_url: std::env::var(ENV_API_URL)
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            allow_anonymous: env_bool(ENV_ALLOW_ANONYMOUS, false),
        },
        webhook: WebhookConfig { secret: webhook_secret },
        database: DatabaseConfig { path: db_path, pool_size },
        server: ServerConfig {
            listen_addr: std::env::var(ENV_LISTEN_ADDR)
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
        },
        auth: load_auth_config()?,
    })
}

/// The auth service needs both its URL and service key; configuring
/// only one is a deployment mistake, not an anonymous deployment.
fn load_auth_config() -> Result<Option<AuthConfig>> {
    let url = std::env::var(ENV_AUTH_URL).ok();
    let service_key = std::env::var(ENV_SERVICE_KEY).ok();

    match (url, service_key) {
        (Some(url), Some(service_key)) => Ok(Some(AuthConfig { url, service_key })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(FocusboardError::Config(format!(
            "{ENV_AUTH_URL} is set but {ENV_SERVICE_KEY} is missing"
        ))),
        (None, Some(_)) => Err(FocusboardError::Config(format!(
            "{ENV_SERVICE_KEY} is set but {ENV_AUTH_URL} is missing"
        ))),
    }
}

fn require(key: &'static str, missing: &mut Vec<&'static str>) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            missing.push(key);
            String::new()
        }
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
