//! Core domain types for the procedure tracker.

mod entry;
mod geometry;
mod privacy;
mod procedure;
mod verification;

pub(crate) use entry::EntryParts;
pub use entry::{AfterCareLog, Complication, ComplicationSeverity, ProgressEntry, Rating};
pub use geometry::{BoundingBox, FaceLandmarks, Point};
pub use privacy::{
    BlurSettings, PrivacyMode, PrivacySettings, DEFAULT_BLUR_STRENGTH, MAX_BLUR_STRENGTH,
    MIN_BLUR_STRENGTH,
};
pub use procedure::{Procedure, ProcedureType};
pub use verification::{CaptureMethod, VerificationData};
