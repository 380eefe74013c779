//! Glowtrack Core - Domain types, ports and the capture pipeline
//!
//! This crate contains the procedure and progress-entry model, the collaborator
//! ports (camera, face locator, clock, key-value store), and the pipeline that
//! hashes captures, redacts identifying regions, assembles entries and renders
//! timelines and reports.

pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;

pub use domain::{
    AfterCareLog, BlurSettings, BoundingBox, CaptureMethod, Complication, ComplicationSeverity,
    FaceLandmarks, Point, PrivacyMode, PrivacySettings, Procedure, ProcedureType, ProgressEntry,
    Rating, VerificationData,
};
pub use error::{Result, TrackerError};
pub use pipeline::{
    CaptureSession, EntryAssembler, EntryDetails, PrivacyRedactor, SessionState, TrackerContext,
    TrackerRepository,
};
pub use ports::{Clock, FaceDetector, FaceLocator, Facing, KeyValueStore, MediaCapture};
