//! Token exchange orchestration - core business logic
//!
//! Drives the three exchange steps in order: code-for-token, identity
//! fetch, connection upsert. Persistence happens only after both
//! upstream steps succeed, so no failure path can leave a half-written
//! connection row.

use std::sync::Arc;

use focusboard_domain::{ConnectionUpsert, FocusboardError, Result};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ports::{ConnectionRepository, GitHubGateway};

/// One exchange request as received from the callback path.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    /// Authorization code from the provider redirect. Single use.
    pub code: String,
    /// Must equal the redirect URI from the authorization request.
    pub redirect_uri: String,
    /// Verified caller identity, if any.
    pub user_id: Option<String>,
}

/// Result of a successful exchange.
///
/// `access_token` is populated only on the anonymous path, where the
/// caller has no other way to retain it; the authenticated path never
/// returns the raw secret.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeOutcome {
    pub github_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Token exchange service
pub struct TokenExchangeService {
    gateway: Arc<dyn GitHubGateway>,
    connections: Arc<dyn ConnectionRepository>,
    allow_anonymous: bool,
}

impl TokenExchangeService {
    /// Create a new exchange service.
    ///
    /// `allow_anonymous` enables the session-only mode in which an
    /// exchange without a caller identity returns the token instead of
    /// persisting it. Off by default in production configuration.
    pub fn new(
        gateway: Arc<dyn GitHubGateway>,
        connections: Arc<dyn ConnectionRepository>,
        allow_anonymous: bool,
    ) -> Self {
        Self { gateway, connections, allow_anonymous }
    }

    /// Run the full exchange.
    ///
    /// # Errors
    /// - [`FocusboardError::Auth`] if no caller identity is present and
    ///   anonymous mode is disabled (checked before any upstream call),
    ///   or if the provider rejects the code
    /// - [`FocusboardError::Network`] on transient upstream failure
    /// - [`FocusboardError::Database`] if the upsert fails
    ///
    /// Authorization codes are single use, so nothing here retries: a
    /// failed exchange means the user restarts the connect flow.
    pub async fn exchange(&self, request: ExchangeRequest) -> Result<ExchangeOutcome> {
        if request.redirect_uri.is_empty() {
            return Err(FocusboardError::InvalidInput(
                "missing redirectUri parameter".to_string(),
            ));
        }

        if request.user_id.is_none() && !self.allow_anonymous {
            return Err(FocusboardError::Auth("authentication required".to_string()));
        }

        debug!(redirect_uri = %request.redirect_uri, "exchanging authorization code");
        let tokens = self.gateway.exchange_code(&request.code, &request.redirect_uri).await?;

        // A connection must never be stored without a verified
        // identity; failure here fails the whole operation.
        let identity = self.gateway.fetch_identity(&tokens.access_token).await?;

        match request.user_id {
            Some(user_id) => {
                let connection = self
                    .connections
                    .upsert(ConnectionUpsert {
                        user_id,
                        access_token: tokens.access_token,
                        refresh_token: tokens.refresh_token,
                        github_username: identity.login.clone(),
                    })
                    .await?;

                info!(github_username = %identity.login, "GitHub connection stored");
                Ok(ExchangeOutcome {
                    github_username: identity.login,
                    connection_id: Some(connection.id),
                    access_token: None,
                })
            }
            None => {
                info!(github_username = %identity.login, "anonymous exchange, nothing persisted");
                Ok(ExchangeOutcome {
                    github_username: identity.login,
                    connection_id: None,
                    access_token: Some(tokens.access_token),
                })
            }
        }
    }
}
