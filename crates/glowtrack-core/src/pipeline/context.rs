//! Explicitly owned collaborators shared by capture sessions.

use crate::ports::{Clock, FaceDetector, KeyValueStore};

use super::repository::TrackerRepository;
use super::verify::HashVerifier;

/// Collaborators a capture session needs, constructed once by the caller.
pub struct TrackerContext {
    detector: FaceDetector,
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
    device_info: Option<String>,
}

impl TrackerContext {
    /// Creates a context without face detection.
    #[must_use]
    pub fn new(clock: impl Clock + 'static, store: impl KeyValueStore + 'static) -> Self {
        Self {
            detector: FaceDetector::Unavailable,
            clock: Box::new(clock),
            store: Box::new(store),
            device_info: None,
        }
    }

    #[must_use]
    pub fn with_detector(mut self, detector: FaceDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sets the opaque device descriptor recorded in verification data.
    #[must_use]
    pub fn with_device_info(mut self, device_info: Option<String>) -> Self {
        self.device_info = device_info;
        self
    }

    #[must_use]
    pub const fn detector(&self) -> &FaceDetector {
        &self.detector
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[must_use]
    pub fn device_info(&self) -> Option<&str> {
        self.device_info.as_deref()
    }

    #[must_use]
    pub fn repository(&self) -> TrackerRepository<'_> {
        TrackerRepository::new(self.store.as_ref())
    }

    #[must_use]
    pub fn verifier(&self) -> HashVerifier<'_> {
        HashVerifier::new(self.clock.as_ref(), self.device_info.clone())
    }
}

impl std::fmt::Debug for TrackerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerContext")
            .field("detector", &self.detector)
            .field("device_info", &self.device_info)
            .finish_non_exhaustive()
    }
}
