//! Authorization Initiator
//!
//! Builds the GitHub authorization URL and persists the CSRF nonce the
//! Callback Receiver will verify. The caller performs the actual
//! navigation; once the page unloads no in-memory state survives, which
//! is why the nonce goes through the [`StateStore`].

use std::sync::Arc;

use focusboard_domain::{FocusboardError, Result};

use super::nonce::generate_nonce;
use super::{StateStore, OAUTH_STATE_KEY};

/// Builds CSRF-protected authorization requests.
pub struct AuthorizationInitiator {
    client_id: String,
    authorize_url: String,
    redirect_uri: String,
    scope: String,
    store: Arc<dyn StateStore>,
}

impl AuthorizationInitiator {
    /// Create a new initiator.
    ///
    /// # Arguments
    /// * `client_id` - OAuth app client id (may be empty if unconfigured)
    /// * `authorize_url` - the provider's authorization endpoint
    /// * `redirect_uri` - the app's callback route on its current origin
    /// * `scope` - OAuth scope to request
    /// * `store` - client-local storage for the nonce
    pub fn new(
        client_id: impl Into<String>,
        authorize_url: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            authorize_url: authorize_url.into(),
            redirect_uri: redirect_uri.into(),
            scope: scope.into(),
            store,
        }
    }

    /// Begin the connect flow.
    ///
    /// Generates a fresh nonce, persists it under [`OAUTH_STATE_KEY`]
    /// (replacing any stale value from an abandoned flow), and returns
    /// the URL to navigate the user agent to.
    ///
    /// # Errors
    /// Returns a configuration error if the client id is not set. The
    /// check runs before anything is stored so a misconfigured app
    /// never redirects with a malformed request.
    pub fn begin(&self) -> Result<String> {
        if self.client_id.is_empty() {
            return Err(FocusboardError::Config(
                "GitHub client id is not configured".to_string(),
            ));
        }

        let state = generate_nonce();
        self.store.save(OAUTH_STATE_KEY, &state);

        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", self.scope.as_str()),
            ("state", state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", self.authorize_url, query_string))
    }

    /// Redirect URI the authorization request was built with.
    ///
    /// The token endpoint requires redirect-uri equality between the
    /// authorize and exchange steps, so the Callback Receiver must be
    /// constructed with this exact value.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }
}
