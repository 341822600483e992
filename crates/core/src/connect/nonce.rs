//! CSRF nonce generation for the OAuth authorization request

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;

/// Generate a random state nonce for CSRF protection
///
/// Returns a URL-safe base64-encoded random string of 32 bytes
/// (43 characters).
#[must_use]
pub fn generate_nonce() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}
