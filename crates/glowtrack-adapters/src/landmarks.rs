//! Face landmarks read from a JSON sidecar.
//!
//! The sidecar is produced by an external landmark tool and holds either a
//! `FaceLandmarks` record or `null` when no face was found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use glowtrack_core::{FaceLandmarks, FaceLocator};
use image::DynamicImage;
use tracing::debug;

/// `FaceLocator` that reads precomputed landmarks from a file.
#[derive(Debug, Clone)]
pub struct LandmarkFileLocator {
    path: PathBuf,
}

impl LandmarkFileLocator {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FaceLocator for LandmarkFileLocator {
    fn name(&self) -> &'static str {
        "landmark-file"
    }

    fn locate(&self, image: &DynamicImage) -> Result<Option<FaceLandmarks>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read landmarks from {}", self.path.display()))?;
        let landmarks: Option<FaceLandmarks> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid landmark file {}", self.path.display()))?;

        let Some(landmarks) = landmarks else {
            return Ok(None);
        };
        if !landmarks.fits_within(image.width(), image.height()) {
            debug!(
                "Landmarks {:?} do not fit a {}x{} image, ignoring",
                landmarks.bbox,
                image.width(),
                image.height()
            );
            return Ok(None);
        }
        Ok(Some(landmarks))
    }
}
