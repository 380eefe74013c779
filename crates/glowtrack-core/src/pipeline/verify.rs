//! Content hashing and verification records.

use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{CaptureMethod, VerificationData};
use crate::error::{Result, TrackerError};
use crate::ports::Clock;

/// Returns the payload with any `data:...;base64,` prefix removed.
#[must_use]
pub fn strip_data_url(payload: &str) -> &str {
    payload.split_once(',').map_or(payload, |(_, data)| data)
}

/// Decodes a base64 payload, with or without a data-URL prefix.
///
/// # Errors
///
/// Returns `TrackerError::InvalidPayload` if the body is not valid base64.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(strip_data_url(payload).trim())
        .map_err(|e| TrackerError::InvalidPayload(e.to_string()))
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Hashes the decoded bytes of an image payload.
///
/// # Errors
///
/// Returns `TrackerError::HashComputation` if the payload cannot be decoded;
/// a verification record never carries a hash that was not computed.
pub fn content_hash(payload: &str) -> Result<String> {
    let bytes = decode_payload(payload).map_err(|e| TrackerError::HashComputation(e.to_string()))?;
    Ok(hash_bytes(&bytes))
}

/// Stamps raw captures with a content hash and capture metadata.
pub struct HashVerifier<'a> {
    clock: &'a dyn Clock,
    device_info: Option<String>,
}

impl<'a> HashVerifier<'a> {
    #[must_use]
    pub fn new(clock: &'a dyn Clock, device_info: Option<String>) -> Self {
        Self { clock, device_info }
    }

    /// Builds the verification record for a capture.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::HashComputation` if hashing fails.
    pub fn create(&self, payload: &str, capture_method: CaptureMethod) -> Result<VerificationData> {
        let hash = content_hash(payload)?;
        debug!("Computed capture hash {hash} ({capture_method:?})");

        Ok(VerificationData {
            hash,
            capture_method,
            device_info: self.device_info.clone(),
            timestamp: self.clock.now(),
            timezone: self.clock.timezone(),
        })
    }
}

/// Rehashes `payload` and compares it to a stored hash.
///
/// # Errors
///
/// Returns `TrackerError::HashComputation` if the payload cannot be hashed.
pub fn recheck_hash(payload: &str, stored_hash: &str) -> Result<bool> {
    Ok(content_hash(payload)? == stored_hash)
}
