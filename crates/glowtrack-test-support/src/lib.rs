//! Test support utilities for glowtrack.
//!
//! Provides port mocks, synthetic image builders and a face fixture for
//! testing the capture pipeline.
//!
//! # Example
//!
//! ```
//! use glowtrack_test_support::{FixedClock, MemoryStore, SyntheticImageBuilder};
//!
//! let frame = SyntheticImageBuilder::checkerboard(200, 200);
//! let store = MemoryStore::new();
//! let clock = FixedClock::default();
//! # let _ = (frame, store, clock);
//! ```

mod builders;
mod mocks;

pub use builders::{face_fixture, SyntheticImageBuilder};
pub use mocks::{
    CameraMonitor, FailingLocator, FixedClock, MemoryStore, MockCamera, StaticLocator,
};
