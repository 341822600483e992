//! Callback Receiver
//!
//! Handles the redirect back from GitHub: validates the one-time nonce
//! against the `state` query parameter and, on success, hands the
//! authorization code to the Token Exchange Service. Every verification
//! attempt consumes the nonce, so a replayed callback fails closed with
//! "state not found" rather than reaching the exchange.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use focusboard_domain::{FocusboardError, Result};
use tracing::warn;

use super::{StateStore, OAUTH_STATE_KEY};
use crate::exchange::ExchangeOutcome;

/// Seam between the browser-side receiver and the server-side exchange.
#[async_trait]
pub trait ExchangePort: Send + Sync {
    /// Exchange an authorization code. `redirect_uri` must equal the
    /// value used in the authorization request.
    async fn exchange(&self, code: &str, redirect_uri: &str) -> Result<ExchangeOutcome>;
}

/// Query parameters of a callback invocation.
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse from a raw query string (`code=XYZ&state=abc`).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            let decoded = urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_default();
            match key {
                "code" => params.code = Some(decoded),
                "state" => params.state = Some(decoded),
                "error" => params.error = Some(decoded),
                _ => {}
            }
        }
        params
    }
}

/// Outcome of a callback invocation.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// Exchange completed; the connection details are in the outcome.
    Completed(ExchangeOutcome),
    /// The route loaded without OAuth parameters; nothing to do.
    Ignored,
    /// Another invocation is mid-exchange; this one was dropped.
    InFlight,
}

/// Validates callbacks and drives the exchange.
pub struct CallbackReceiver {
    store: Arc<dyn StateStore>,
    exchanger: Arc<dyn ExchangePort>,
    redirect_uri: String,
    processing: AtomicBool,
}

impl CallbackReceiver {
    /// Query parameters the shell must strip from the visible URL after
    /// processing, in every branch, so a refresh cannot replay the
    /// callback.
    pub const STRIP_PARAMS: [&'static str; 3] = ["code", "state", "error"];

    /// Create a receiver.
    ///
    /// `redirect_uri` must be the exact value the Initiator used; the
    /// token endpoint requires equality between the two steps.
    pub fn new(
        store: Arc<dyn StateStore>,
        exchanger: Arc<dyn ExchangePort>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            store,
            exchanger,
            redirect_uri: redirect_uri.into(),
            processing: AtomicBool::new(false),
        }
    }

    /// Whether an exchange is currently in flight.
    ///
    /// Exposed so the shell can render a distinct "processing" state
    /// and avoid double submission.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Handle one callback invocation.
    ///
    /// # Errors
    /// - [`FocusboardError::Auth`] when the provider reported an error
    ///   (the user must restart the flow; a fresh code needs a fresh
    ///   nonce)
    /// - [`FocusboardError::Security`] when no nonce was stored or the
    ///   stored nonce does not match `state`; no exchange is attempted
    /// - whatever the exchange itself returns
    ///
    /// The stored nonce is consumed in all of these branches.
    pub async fn handle(&self, params: CallbackParams) -> Result<CallbackOutcome> {
        if let Some(provider_error) = params.error {
            // The nonce belongs to the flow that just failed; a retry
            // must start over with a fresh one.
            let _ = self.store.take(OAUTH_STATE_KEY);
            return Err(FocusboardError::Auth(format!(
                "GitHub authorization failed: {provider_error}"
            )));
        }

        let (code, state) = match (params.code, params.state) {
            (Some(code), Some(state)) => (code, state),
            _ => return Ok(CallbackOutcome::Ignored),
        };

        // Secondary safety net behind the one-time nonce: a double
        // navigation event must not start a second exchange.
        if self
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(CallbackOutcome::InFlight);
        }
        let _guard = ProcessingGuard(&self.processing);

        let stored = self.store.take(OAUTH_STATE_KEY).ok_or_else(|| {
            FocusboardError::Security("authentication state not found".to_string())
        })?;

        if stored != state {
            warn!(expected = %stored, received = %state, "OAuth state mismatch on callback");
            return Err(FocusboardError::Security(
                "invalid authentication state".to_string(),
            ));
        }

        let outcome = self.exchanger.exchange(&code, &self.redirect_uri).await?;
        Ok(CallbackOutcome::Completed(outcome))
    }
}

/// Clears the processing flag when the exchange settles, on success or
/// failure.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
