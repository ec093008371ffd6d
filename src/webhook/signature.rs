//! Webhook origin authentication.
//!
//! The signature is an HMAC-SHA512 over the payload exactly as received on
//! the wire. Hashing a re-serialized copy of the parsed body would break on
//! key ordering or whitespace differences, so callers must pass the raw bytes.

use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Hex-encoded HMAC-SHA512 of `payload` under `secret`.
pub fn compute_signature(payload: &[u8], secret: &str) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Returns true iff `provided_hex` is the keyed hash of `payload` under
/// `secret`. Comparison is constant-time over the hex strings; length
/// mismatches and non-hex input are rejected without erroring.
pub fn verify_signature(payload: &[u8], provided_hex: &str, secret: &str) -> bool {
    let computed = compute_signature(payload, secret);
    let provided = provided_hex.trim().to_ascii_lowercase();

    if computed.len() != provided.len() {
        return false;
    }

    computed
        .as_bytes()
        .iter()
        .zip(provided.as_bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
