//! Capture session state machine.
//!
//! ```text
//! Idle -> Capturing -> Captured -> Redacting -> Detailing -> Saved
//!   \________\___________\___________\____________\-------> Cancelled
//! ```
//!
//! All image buffers are session-local. Nothing is persisted before `save`,
//! and cancelling (or dropping) a session releases the camera.

use std::fmt;

use image::DynamicImage;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::assemble::{EntryAssembler, EntryDetails, EntryDraft};
use super::codec::{decode_image, png_data_url};
use super::context::TrackerContext;
use super::redact::{PrivacyRedactor, Redaction};
use crate::domain::{BlurSettings, CaptureMethod, FaceLandmarks, ProgressEntry, VerificationData};
use crate::error::{Result, TrackerError};
use crate::ports::{Facing, MediaCapture};

/// Where a capture session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
    Captured,
    Redacting,
    Detailing,
    Saved,
    Cancelled,
}

impl SessionState {
    /// Returns true for `Saved` and `Cancelled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Saved | Self::Cancelled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Captured => "captured",
            Self::Redacting => "redacting",
            Self::Detailing => "detailing",
            Self::Saved => "saved",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Capture {
    payload: String,
    image: DynamicImage,
    method: CaptureMethod,
}

/// One capture-to-save flow for a chosen procedure.
pub struct CaptureSession<'a> {
    ctx: &'a TrackerContext,
    camera: Box<dyn MediaCapture>,
    procedure_id: Uuid,
    facing: Facing,
    state: SessionState,
    capture: Option<Capture>,
    verification: Option<VerificationData>,
    landmarks: Option<FaceLandmarks>,
    redaction: Option<Redaction>,
}

impl<'a> CaptureSession<'a> {
    /// Opens an idle session for `procedure_id`.
    #[must_use]
    pub fn new(ctx: &'a TrackerContext, camera: Box<dyn MediaCapture>, procedure_id: Uuid) -> Self {
        Self {
            ctx,
            camera,
            procedure_id,
            facing: Facing::default(),
            state: SessionState::Idle,
            capture: None,
            verification: None,
            landmarks: None,
            redaction: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    #[must_use]
    pub const fn procedure_id(&self) -> Uuid {
        self.procedure_id
    }

    /// Verification record, available from `Redacting` on.
    #[must_use]
    pub const fn verification(&self) -> Option<&VerificationData> {
        self.verification.as_ref()
    }

    /// Landmarks located when the capture was accepted.
    #[must_use]
    pub const fn landmarks(&self) -> Option<&FaceLandmarks> {
        self.landmarks.as_ref()
    }

    /// Latest redaction result.
    #[must_use]
    pub const fn redaction(&self) -> Option<&Redaction> {
        self.redaction.as_ref()
    }

    /// Acquires the camera, tearing down any stream already held.
    ///
    /// Also used to restart from `Capturing` with a different facing.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Acquisition` if the camera cannot be started;
    /// the session drops back to `Idle` so the caller can retry.
    pub fn start_camera(&mut self, facing: Facing) -> Result<()> {
        self.require("start the camera", &[SessionState::Idle, SessionState::Capturing])?;
        if self.camera.is_active() {
            self.camera.stop();
        }

        if let Err(e) = self.camera.start(facing) {
            self.state = SessionState::Idle;
            return Err(TrackerError::Acquisition(format!("{e:#}")));
        }

        self.facing = facing;
        self.state = SessionState::Capturing;
        debug!("Camera started ({facing:?})");
        Ok(())
    }

    /// Flips between front and rear camera by stopping and restarting.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidTransition` outside `Capturing`, or
    /// `TrackerError::Acquisition` if the restart fails.
    pub fn switch_camera(&mut self) -> Result<()> {
        self.require("switch camera", &[SessionState::Capturing])?;
        self.start_camera(self.facing.toggled())
    }

    /// Snapshots the live stream as a verified in-app capture.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Acquisition` if no frame can be read.
    pub fn capture_frame(&mut self) -> Result<()> {
        self.require("capture a frame", &[SessionState::Capturing])?;
        let image = self
            .camera
            .snapshot()
            .map_err(|e| TrackerError::Acquisition(format!("{e:#}")))?;
        let payload = png_data_url(&image)?;

        self.capture = Some(Capture {
            payload,
            image,
            method: CaptureMethod::InApp,
        });
        self.state = SessionState::Captured;
        debug!("Captured in-app frame");
        Ok(())
    }

    /// Uses an uploaded data URL instead of a live frame. Never verified.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidPayload` if the payload is not an image.
    pub fn upload(&mut self, payload: String) -> Result<()> {
        self.require("upload an image", &[SessionState::Idle, SessionState::Capturing])?;
        let image = decode_image(&payload)?;

        self.capture = Some(Capture {
            payload,
            image,
            method: CaptureMethod::UploadTest,
        });
        self.state = SessionState::Captured;
        debug!("Loaded test upload");
        Ok(())
    }

    /// Discards the capture and returns to the live view, or to `Idle` when
    /// no stream is held.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidTransition` outside `Captured`.
    pub fn retake(&mut self) -> Result<()> {
        self.require("retake", &[SessionState::Captured])?;
        self.capture = None;
        self.state = if self.camera.is_active() {
            SessionState::Capturing
        } else {
            SessionState::Idle
        };
        Ok(())
    }

    /// Accepts the capture: stops the camera, stamps the verification record,
    /// locates the face once and runs the first redaction.
    ///
    /// # Errors
    ///
    /// - `TrackerError::InvalidBlurStrength` if `blur` is out of range; the
    ///   session stays in `Captured`.
    /// - `TrackerError::HashComputation` if the capture cannot be hashed; the
    ///   session is cancelled.
    pub fn accept(&mut self, blur: BlurSettings) -> Result<&Redaction> {
        self.require("accept the capture", &[SessionState::Captured])?;
        if blur.any_region() {
            blur.validate()?;
        }
        self.camera.stop();

        let Some(capture) = &self.capture else {
            return Err(self.invalid("accept the capture"));
        };
        let verification = match self.ctx.verifier().create(&capture.payload, capture.method) {
            Ok(v) => v,
            Err(e) => {
                warn!("Verification failed, cancelling session: {e}");
                self.cancel();
                return Err(e);
            }
        };

        self.landmarks = self.ctx.detector().detect(&capture.image);
        self.verification = Some(verification);
        self.state = SessionState::Redacting;
        self.apply_settings(blur)
    }

    /// Re-runs redaction from the original capture with new settings.
    ///
    /// Idempotent: the same settings always produce the same image.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidBlurStrength` if `blur` is out of range;
    /// the previous redaction is kept.
    pub fn apply_settings(&mut self, blur: BlurSettings) -> Result<&Redaction> {
        self.require("apply privacy settings", &[SessionState::Redacting])?;
        let Some(capture) = &self.capture else {
            return Err(self.invalid("apply privacy settings"));
        };

        let redaction = PrivacyRedactor::new().redact(&capture.image, blur, self.landmarks.as_ref())?;
        debug!("Redacted with {:?} ({:?})", blur, redaction.settings.mode);
        Ok(self.redaction.insert(redaction))
    }

    /// Confirms the redaction and moves on to metadata entry.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidTransition` outside `Redacting`.
    pub fn confirm_redaction(&mut self) -> Result<()> {
        self.require("confirm redaction", &[SessionState::Redacting])?;
        if self.redaction.is_none() {
            return Err(self.invalid("confirm redaction"));
        }
        self.state = SessionState::Detailing;
        Ok(())
    }

    /// Assembles and persists the entry, ending the session.
    ///
    /// On failure the session stays in `Detailing` so the save can be retried.
    ///
    /// # Errors
    ///
    /// - `TrackerError::ProcedureNotFound` if the procedure no longer exists.
    /// - `TrackerError::InvalidRating` for a rating outside 1-5.
    /// - `TrackerError::Persistence` if the store cannot be read or written.
    pub fn save(&mut self, details: EntryDetails) -> Result<ProgressEntry> {
        self.require("save", &[SessionState::Detailing])?;
        let (Some(capture), Some(verification), Some(redaction)) =
            (&self.capture, &self.verification, &self.redaction)
        else {
            return Err(self.invalid("save"));
        };

        let protected = DynamicImage::ImageRgba8(redaction.image.clone());
        let draft = EntryDraft {
            procedure_id: self.procedure_id,
            photo_original: capture.payload.clone(),
            photo_protected: png_data_url(&protected)?,
            privacy_settings: redaction.settings.clone(),
            verification: verification.clone(),
            details,
        };

        let repository = self.ctx.repository();
        let procedures = repository.procedures()?;
        let entry = EntryAssembler::new().create(&procedures, draft, self.ctx.clock().now())?;
        repository.append_entry(entry.clone())?;

        self.discard_buffers();
        self.state = SessionState::Saved;
        info!(
            "Saved entry {} (day {}, verified: {})",
            entry.id(),
            entry.days_since_procedure(),
            entry.verified()
        );
        Ok(entry)
    }

    /// Aborts the session, releasing the camera and dropping all buffers.
    ///
    /// No-op once the session has ended. Later calls fail with
    /// `TrackerError::Cancelled`.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.camera.stop();
        self.discard_buffers();
        debug!("Session cancelled from {}", self.state);
        self.state = SessionState::Cancelled;
    }

    fn discard_buffers(&mut self) {
        self.capture = None;
        self.verification = None;
        self.landmarks = None;
        self.redaction = None;
    }

    fn require(&self, action: &'static str, allowed: &[SessionState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else if self.state == SessionState::Cancelled {
            Err(TrackerError::Cancelled)
        } else {
            Err(self.invalid(action))
        }
    }

    const fn invalid(&self, action: &'static str) -> TrackerError {
        TrackerError::InvalidTransition {
            action,
            state: self.state,
        }
    }
}

impl Drop for CaptureSession<'_> {
    fn drop(&mut self) {
        if self.camera.is_active() {
            self.camera.stop();
        }
    }
}

impl fmt::Debug for CaptureSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("procedure_id", &self.procedure_id)
            .field("state", &self.state)
            .field("facing", &self.facing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::Saved.is_terminal());
        assert!(SessionState::Cancelled.is_terminal());
        assert!(!SessionState::Detailing.is_terminal());
    }

    #[test]
    fn test_transition_error_message() {
        let err = TrackerError::InvalidTransition {
            action: "save",
            state: SessionState::Capturing,
        };
        assert_eq!(err.to_string(), "Cannot save while session is capturing");
    }

    #[test]
    fn test_cancelled_error_message() {
        assert_eq!(TrackerError::Cancelled.to_string(), "Capture session cancelled");
    }
}
