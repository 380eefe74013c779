//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the pipeline and the outside
//! world: face landmark detection, persistence, time and the camera.

mod clock;
mod face_locator;
mod media_capture;
mod store;

pub use clock::Clock;
pub use face_locator::{FaceDetector, FaceLocator};
pub use media_capture::{Facing, MediaCapture};
pub use store::KeyValueStore;
