//! The capture pipeline: verify, redact, assemble, persist, report.

mod assemble;
mod codec;
mod context;
mod export;
mod redact;
mod regions;
mod repository;
mod session;
mod timeline;
mod verify;

pub use assemble::{days_since, EntryAssembler, EntryDetails, EntryDraft};
pub use codec::{data_url, decode_image, png_data_url};
pub use context::TrackerContext;
pub use export::render_report;
pub use redact::{PrivacyRedactor, Redaction, EYE_BLUR_MULTIPLIER, FALLBACK_TOP_FRACTION};
pub use regions::{eye_regions, face_cutout, hair_region, Ellipse, Polygon, Region};
pub use repository::{TrackerRepository, ENTRIES_KEY, PROCEDURES_KEY};
pub use session::{CaptureSession, SessionState};
pub use timeline::{reconstruct_timeline, timeline_for, ProcedureTimeline};
pub use verify::{content_hash, decode_payload, hash_bytes, recheck_hash, strip_data_url, HashVerifier};
