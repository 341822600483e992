//! Browser-side GitHub connect flow
//!
//! The Authorization Initiator builds the CSRF-protected authorization
//! request and the Callback Receiver validates the redirect back into
//! the app. Both sit behind the [`StateStore`] port, which models the
//! single client-local slot holding the OAuth nonce.
//!
//! Security properties:
//! - the nonce is single-use: it is removed from storage on every
//!   verification attempt, successful or not
//! - a callback whose `state` does not equal the stored nonce is
//!   rejected before any exchange call is made
//! - a second callback while an exchange is in flight is ignored

mod callback;
mod initiator;
mod nonce;

pub use callback::{CallbackOutcome, CallbackParams, CallbackReceiver, ExchangePort};
pub use initiator::AuthorizationInitiator;
pub use nonce::generate_nonce;

/// Name of the client-local slot holding the OAuth nonce.
pub const OAUTH_STATE_KEY: &str = "github_oauth_state";

/// Client-local storage for the OAuth transaction nonce.
///
/// Implementations wrap whatever the UI shell uses for persistence
/// (browser local storage in the web app, an in-memory map in tests).
/// Single-threaded cooperative use is assumed; this is not a lock.
pub trait StateStore: Send + Sync {
    /// Store a value under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str);

    /// Remove and return the value under `key`.
    fn take(&self, key: &str) -> Option<String>;
}
