//! Discord interaction request verification.
//!
//! Discord signs every interaction with Ed25519 over `timestamp || body`.
//! Reference: https://discord.com/developers/docs/interactions/receiving-and-responding#security-and-authorization

use axum::http::HeaderMap;
use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use tracing::warn;

use crate::error::ConfigError;

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the timestamp that prefixes the signed message.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Public key used to verify inbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationKey(VerifyingKey);

impl VerificationKey {
    /// Parse a hex-encoded 32-byte Ed25519 public key.
    pub fn from_hex(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingPublicKey);
        }

        let bytes = hex::decode(raw).map_err(|e| ConfigError::InvalidHex(e.to_string()))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ConfigError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })?;

        VerifyingKey::from_bytes(&bytes)
            .map(Self)
            .map_err(|_| ConfigError::InvalidPoint)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }
}

impl From<VerifyingKey> for VerificationKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}

/// Borrowed view of an inbound request: headers plus the untouched body.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    headers: &'a HeaderMap,
    body: &'a [u8],
}

impl<'a> SignedRequest<'a> {
    pub fn new(headers: &'a HeaderMap, body: &'a [u8]) -> Self {
        Self { headers, body }
    }

    /// Header value by name, case-insensitively. Empty values count as absent.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }
}

/// Verify that a request was signed by the holder of `key`.
///
/// The signed message is the timestamp header followed by the raw body.
///
/// # Returns
///
/// `true` only if every header is present and well formed and the signature
/// checks out. Any failure yields `false`.
pub fn verify_request(request: &SignedRequest<'_>, key: &VerificationKey) -> bool {
    let Some(signature_hex) = request.header(SIGNATURE_HEADER) else {
        warn!("interaction_signature_missing");
        return false;
    };

    let mut signature = [0u8; SIGNATURE_LENGTH];
    if hex::decode_to_slice(signature_hex, &mut signature).is_err() {
        warn!(
            signature_length = signature_hex.len(),
            "interaction_signature_malformed"
        );
        return false;
    }

    let Some(timestamp) = request.header(TIMESTAMP_HEADER) else {
        warn!("interaction_timestamp_missing");
        return false;
    };

    let body = request.body();
    if body.is_empty() {
        warn!("interaction_body_empty");
        return false;
    }

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    let valid = key
        .0
        .verify(&message, &Signature::from_bytes(&signature))
        .is_ok();

    if !valid {
        warn!(
            timestamp = %timestamp,
            body_length = body.len(),
            "interaction_signature_mismatch"
        );
    }

    valid
}
