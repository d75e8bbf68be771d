//! Webhook payload signatures.
//!
//! Chat gateways sign the raw request body with HMAC-SHA512 and send the hex
//! digest in the `X-Webhook-Hmac` header.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the hex-encoded body digest.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Hmac";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing X-Webhook-Hmac header")]
    Missing,

    #[error("signature is not valid hex")]
    Malformed,

    #[error("signature does not match payload")]
    Mismatch,
}

/// Verifies body signatures against a shared key.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Secret<String>,
}

impl WebhookVerifier {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Secret::new(key.into()),
        }
    }

    /// Checks `signature` (hex, as received) against the HMAC of `payload`.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), SignatureError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SignatureError::Missing)?;
        let received = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;
        let expected = self.digest(payload)?;

        if expected.len() != received.len() || expected.ct_eq(&received).unwrap_u8() != 1 {
            return Err(SignatureError::Mismatch);
        }
        Ok(())
    }

    /// Hex digest of `payload`, as a gateway would send it.
    pub fn sign(&self, payload: &[u8]) -> Result<String, SignatureError> {
        Ok(hex::encode(self.digest(payload)?))
    }

    fn digest(&self, payload: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let mut mac = HmacSha512::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|_| SignatureError::Mismatch)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}
