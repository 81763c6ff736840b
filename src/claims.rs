use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::types::AccessClaims;

/// Reads the claims of an access credential without checking its signature.
///
/// The credential must have exactly three dot-separated segments; the middle
/// one is base64url JSON. Any deviation yields `None`. Validity is decided by
/// the issuer on every protected call, so the result is a routing hint only.
#[must_use]
pub fn decode_claims(token: &str) -> Option<AccessClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return None;
    };

    let bytes = decode_segment(payload)?;
    serde_json::from_slice(&bytes).ok()
}

/// Base64url to standard alphabet, padded to a multiple of four.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let mut standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    STANDARD.decode(standard).ok()
}
