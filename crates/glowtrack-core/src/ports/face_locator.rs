//! Face landmark detection port.

use image::DynamicImage;
use tracing::{debug, warn};

use crate::domain::FaceLandmarks;

/// Locates a single face and its eye / jaw landmarks.
pub trait FaceLocator: Send + Sync {
    /// Returns the name of this locator.
    fn name(&self) -> &'static str;

    /// Locates the most prominent face.
    ///
    /// `Ok(None)` means no face was found, which is a valid outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector itself fails.
    fn locate(&self, image: &DynamicImage) -> anyhow::Result<Option<FaceLandmarks>>;
}

/// Capability-checked face detection.
///
/// Call sites branch on availability explicitly instead of null-checking a
/// detector handle.
pub enum FaceDetector {
    /// A locator is installed.
    Available(Box<dyn FaceLocator>),
    /// No landmark detection on this platform or configuration.
    Unavailable,
}

impl FaceDetector {
    /// Wraps a locator.
    #[must_use]
    pub fn available(locator: impl FaceLocator + 'static) -> Self {
        Self::Available(Box::new(locator))
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Best-effort detection. Misses and detector errors both yield `None`.
    #[must_use]
    pub fn detect(&self, image: &DynamicImage) -> Option<FaceLandmarks> {
        match self {
            Self::Available(locator) => match locator.locate(image) {
                Ok(Some(landmarks)) => {
                    debug!("{} located face at {:?}", locator.name(), landmarks.bbox);
                    Some(landmarks)
                }
                Ok(None) => {
                    debug!("{} found no face, using fallback redaction", locator.name());
                    None
                }
                Err(e) => {
                    warn!("Face detection error from {}: {e:#}", locator.name());
                    None
                }
            },
            Self::Unavailable => {
                debug!("Face detection unavailable, using fallback redaction");
                None
            }
        }
    }
}

impl std::fmt::Debug for FaceDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(locator) => write!(f, "FaceDetector::Available({})", locator.name()),
            Self::Unavailable => f.write_str("FaceDetector::Unavailable"),
        }
    }
}
