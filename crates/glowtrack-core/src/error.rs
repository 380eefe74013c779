//! Error taxonomy for the capture pipeline.

use thiserror::Error;
use uuid::Uuid;

use crate::pipeline::SessionState;

/// Errors raised by the verification, redaction and assembly stages.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Camera or media source could not be acquired.
    #[error("Unable to access camera: {0}")]
    Acquisition(String),

    /// The content hash could not be computed.
    #[error("Hash computation failed: {0}")]
    HashComputation(String),

    /// Image payload is not valid base64 or not a decodable image.
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// Save attempted against a procedure id that does not exist.
    #[error("Procedure not found: {0}")]
    ProcedureNotFound(Uuid),

    /// Reading or writing the persisted collections failed.
    #[error("Storage error: {0}")]
    Persistence(String),

    /// Blur strength outside the accepted range.
    #[error("Blur strength {value} is not in {min}..={max}")]
    InvalidBlurStrength { value: u8, min: u8, max: u8 },

    /// Rating outside 1..=5.
    #[error("Rating {0} is not in 1..=5")]
    InvalidRating(u8),

    /// Operation not permitted in the session's current state.
    #[error("Cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    /// Session was cancelled; nothing was persisted.
    #[error("Capture session cancelled")]
    Cancelled,
}

/// Result alias used by the pipeline stages.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
