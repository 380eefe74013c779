//! Mock implementations of core port traits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use glowtrack_core::domain::FaceLandmarks;
use glowtrack_core::ports::{Clock, FaceLocator, Facing, KeyValueStore, MediaCapture};
use image::DynamicImage;
use time::macros::datetime;
use time::OffsetDateTime;

/// In-memory `KeyValueStore`.
///
/// Clones share the same map, so a test can keep a handle after moving the
/// store into a context.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: bool,
    write_count: Arc<Mutex<usize>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose writes always fail, as a full quota would.
    #[must_use]
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Returns the raw stored value.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores a raw value, bypassing the failure switch.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Returns the number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self
            .write_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("storage quota exceeded");
        }
        self.insert_raw(key, value);
        *self
            .write_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// `Clock` pinned to a fixed instant and timezone.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: OffsetDateTime,
    timezone: String,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: OffsetDateTime, timezone: impl Into<String>) -> Self {
        Self {
            now,
            timezone: timezone.into(),
        }
    }

    /// A UTC clock at `now`.
    #[must_use]
    pub fn at(now: OffsetDateTime) -> Self {
        Self::new(now, "UTC")
    }
}

impl Default for FixedClock {
    /// 2024-01-11T00:00:00Z in `Asia/Seoul`.
    fn default() -> Self {
        Self::new(datetime!(2024-01-11 0:00 UTC), "Asia/Seoul")
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now
    }

    fn timezone(&self) -> String {
        self.timezone.clone()
    }
}

#[derive(Debug, Default)]
struct CameraLog {
    active: bool,
    starts: Vec<Facing>,
    stops: usize,
    snapshots: usize,
}

/// Mock `MediaCapture` serving a fixed frame.
///
/// Keep a [`CameraMonitor`] to observe the camera after the session owns it.
pub struct MockCamera {
    frame: Option<DynamicImage>,
    deny: bool,
    log: Arc<Mutex<CameraLog>>,
}

impl MockCamera {
    /// Creates a camera that serves `frame`.
    #[must_use]
    pub fn new(frame: DynamicImage) -> Self {
        Self {
            frame: Some(frame),
            deny: false,
            log: Arc::default(),
        }
    }

    /// Creates a camera whose permission is always denied.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            frame: None,
            deny: true,
            log: Arc::default(),
        }
    }

    /// Returns a handle that observes this camera.
    #[must_use]
    pub fn monitor(&self) -> CameraMonitor {
        CameraMonitor {
            log: Arc::clone(&self.log),
        }
    }

    fn log(&self) -> std::sync::MutexGuard<'_, CameraLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaCapture for MockCamera {
    fn start(&mut self, facing: Facing) -> anyhow::Result<()> {
        if self.deny {
            anyhow::bail!("Permission denied");
        }
        let mut log = self.log();
        if log.active {
            anyhow::bail!("stream already acquired");
        }
        log.active = true;
        log.starts.push(facing);
        Ok(())
    }

    fn stop(&mut self) {
        let mut log = self.log();
        if log.active {
            log.active = false;
            log.stops += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.log().active
    }

    fn snapshot(&mut self) -> anyhow::Result<DynamicImage> {
        let mut log = self.log();
        if !log.active {
            anyhow::bail!("camera is not running");
        }
        log.snapshots += 1;
        self.frame
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no frame available"))
    }
}

/// Read-only view of a [`MockCamera`].
#[derive(Clone)]
pub struct CameraMonitor {
    log: Arc<Mutex<CameraLog>>,
}

impl CameraMonitor {
    fn read<T>(&self, f: impl FnOnce(&CameraLog) -> T) -> T {
        f(&self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.read(|l| l.active)
    }

    /// Facing of every successful start, in order.
    #[must_use]
    pub fn starts(&self) -> Vec<Facing> {
        self.read(|l| l.starts.clone())
    }

    /// Number of times an active stream was released.
    #[must_use]
    pub fn stops(&self) -> usize {
        self.read(|l| l.stops)
    }

    #[must_use]
    pub fn snapshots(&self) -> usize {
        self.read(|l| l.snapshots)
    }
}

/// `FaceLocator` returning a fixed result and counting calls.
pub struct StaticLocator {
    landmarks: Option<FaceLandmarks>,
    calls: Arc<Mutex<usize>>,
}

impl StaticLocator {
    /// Always finds `landmarks`.
    #[must_use]
    pub fn found(landmarks: FaceLandmarks) -> Self {
        Self {
            landmarks: Some(landmarks),
            calls: Arc::default(),
        }
    }

    /// Never finds a face.
    #[must_use]
    pub fn miss() -> Self {
        Self {
            landmarks: None,
            calls: Arc::default(),
        }
    }

    /// Shared call counter, readable after the locator is boxed.
    #[must_use]
    pub fn calls(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.calls)
    }
}

impl FaceLocator for StaticLocator {
    fn name(&self) -> &'static str {
        "static"
    }

    fn locate(&self, _image: &DynamicImage) -> anyhow::Result<Option<FaceLandmarks>> {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(self.landmarks.clone())
    }
}

/// `FaceLocator` whose detector always errors.
pub struct FailingLocator;

impl FaceLocator for FailingLocator {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn locate(&self, _image: &DynamicImage) -> anyhow::Result<Option<FaceLandmarks>> {
        anyhow::bail!("model weights missing")
    }
}
