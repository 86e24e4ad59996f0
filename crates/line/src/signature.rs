//! Webhook signature verification.

use {
    base64::{Engine as _, engine::general_purpose::STANDARD},
    hmac::{Hmac, Mac},
    sha2::Sha256,
    tracing::warn,
};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature on webhook deliveries.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify the `x-line-signature` header against the raw request body.
///
/// The platform signs the body with HMAC-SHA256 keyed by the channel
/// secret and sends the digest standard-base64 encoded.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature_header: &str) -> bool {
    let Some(expected) = sign(channel_secret, body) else {
        return false;
    };

    constant_time_eq(&expected, signature_header)
}

/// Compute the base64 signature for a body. Exposed so tests can build
/// valid headers.
#[must_use]
pub fn sign(channel_secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("failed to create HMAC");
            return None;
        },
    };
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
