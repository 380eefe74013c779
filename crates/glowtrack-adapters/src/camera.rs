//! Camera backed by a frame file.
//!
//! An external capture process keeps overwriting a single image file with the
//! latest frame. Starting the stream checks the file is there; a snapshot
//! decodes whatever frame is current.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glowtrack_core::{Facing, MediaCapture};
use image::DynamicImage;
use tracing::debug;

/// `MediaCapture` reading frames from a file.
#[derive(Debug)]
pub struct FrameFileCapture {
    path: PathBuf,
    active: Option<Facing>,
}

impl FrameFileCapture {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            active: None,
        }
    }

    /// Facing of the held stream, if any.
    #[must_use]
    pub const fn facing(&self) -> Option<Facing> {
        self.active
    }
}

impl MediaCapture for FrameFileCapture {
    fn start(&mut self, facing: Facing) -> Result<()> {
        if !self.path.is_file() {
            anyhow::bail!("No frame source at {}", self.path.display());
        }
        debug!("Frame source {} opened ({facing:?})", self.path.display());
        self.active = Some(facing);
        Ok(())
    }

    fn stop(&mut self) {
        if self.active.take().is_some() {
            debug!("Frame source {} released", self.path.display());
        }
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn snapshot(&mut self) -> Result<DynamicImage> {
        if self.active.is_none() {
            anyhow::bail!("Camera is not running");
        }
        image::open(&self.path)
            .with_context(|| format!("Failed to read frame from {}", self.path.display()))
    }
}
