//! Glowtrack Adapters - External adapters for glowtrack.
//!
//! This crate provides adapters for:
//! - Filesystem key-value persistence
//! - System clock and timezone
//! - Frame-file camera source
//! - Landmark sidecar files
//! - Image file loading and EXIF device info

pub mod camera;
pub mod clock;
pub mod codec;
pub mod landmarks;
pub mod store;

pub use camera::FrameFileCapture;
pub use clock::SystemClock;
pub use codec::{device_from_exif, load_data_url};
pub use landmarks::LandmarkFileLocator;
pub use store::{default_data_dir, FsKeyValueStore};
