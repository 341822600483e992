//! Session verification against the hosted auth service.
//!
//! A bearer token the auth service does not recognise resolves to
//! `None` rather than an error, so anonymous mode can still apply.

use std::time::Duration;

use async_trait::async_trait;
use focusboard_core::SessionVerifier;
use focusboard_domain::{AuthConfig, FocusboardError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Verifier backed by the hosted auth service's user endpoint.
pub struct HostedSessionVerifier {
    http: Client,
    user_url: String,
    service_key: String,
}

impl HostedSessionVerifier {
    /// Create a verifier from the auth configuration.
    ///
    /// # Errors
    /// [`FocusboardError::Internal`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FocusboardError::Internal(format!("http client init failed: {e}")))?;

        Ok(Self {
            http,
            user_url: format!("{}/auth/v1/user", config.url.trim_end_matches('/')),
            service_key: config.service_key.clone(),
        })
    }
}

#[async_trait]
impl SessionVerifier for HostedSessionVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(&self.user_url)
            .bearer_auth(bearer_token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| FocusboardError::Network(format!("auth service unreachable: {e}")))?;

        match response.status() {
            status if status.is_success() => {
                let user: UserResponse = response.json().await.map_err(|e| {
                    FocusboardError::Network(format!("malformed auth response: {e}"))
                })?;
                Ok(Some(user.id))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!("bearer token not recognised, treating caller as anonymous");
                Ok(None)
            }
            status => Err(FocusboardError::Network(format!("auth service error ({status})"))),
        }
    }
}

/// Verifier used when no auth service is configured: every caller is
/// anonymous.
pub struct NoopSessionVerifier;

#[async_trait]
impl SessionVerifier for NoopSessionVerifier {
    async fn verify(&self, _bearer_token: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
}
