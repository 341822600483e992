//! Webhook delivery signature verification.
//!
//! GitHub signs the raw request body with HMAC-SHA256 and sends the
//! digest in `x-hub-signature-256` as `sha256=<hex>`. Verification uses
//! a constant-time comparison, and neither the secret nor a valid
//! digest ever reaches the logs.

use focusboard_domain::{FocusboardError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify a delivery signature against the raw request body.
///
/// # Errors
/// [`FocusboardError::Security`] when the header is missing the
/// expected scheme, is not valid hex, or does not match the body.
pub fn verify_signature(secret: &str, body: &[u8], signature_header: &str) -> Result<()> {
    let hex_digest = signature_header
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(invalid_signature)?;

    let claimed = hex::decode(hex_digest).map_err(|_| invalid_signature())?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| FocusboardError::Internal("webhook secret unusable as hmac key".to_string()))?;
    mac.update(body);
    mac.verify_slice(&claimed).map_err(|_| invalid_signature())
}

fn invalid_signature() -> FocusboardError {
    // Deliberately generic: the reason a signature failed must not be
    // distinguishable to the sender.
    FocusboardError::Security("invalid webhook signature".to_string())
}
