//! Privacy redaction of progress photos.
//!
//! With located landmarks, three regions are independently toggleable:
//! - background: everything outside the jaw-and-hairline cutout
//! - hair: an ellipse above the face box
//! - eyes: an ellipse around each eye, blurred harder than the other regions
//!
//! Without landmarks, eye or hair blur falls back to a uniform blur over the
//! top of the frame. Background-only blur has no fallback and leaves the
//! image untouched.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use image::{imageops, DynamicImage, RgbaImage};
use tracing::debug;

use super::regions::{eye_regions, face_cutout, hair_region, PixelRect, Region};
use crate::domain::{BlurSettings, FaceLandmarks, PrivacySettings};
use crate::error::Result;

/// Eye blur radius relative to the other regions.
pub const EYE_BLUR_MULTIPLIER: f32 = 1.5;

/// Fraction of the image height blurred when no face is located.
pub const FALLBACK_TOP_FRACTION: f32 = 0.4;

/// Gaussian support, in sigmas, sampled around a cropped region.
const KERNEL_REACH: f32 = 3.0;

/// Output of a redaction run.
#[derive(Debug, Clone)]
pub struct Redaction {
    /// The protected image.
    pub image: RgbaImage,
    /// The settings and geometry that produced it.
    pub settings: PrivacySettings,
}

/// Applies region-limited blur according to `BlurSettings`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrivacyRedactor;

impl PrivacyRedactor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Produces a redacted copy of `source`. The source is never modified.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidBlurStrength` if a region is enabled and
    /// the strength is outside the accepted range.
    pub fn redact(
        &self,
        source: &DynamicImage,
        blur: BlurSettings,
        landmarks: Option<&FaceLandmarks>,
    ) -> Result<Redaction> {
        let settings = PrivacySettings::resolved(blur, landmarks.cloned());
        let original = source.to_rgba8();

        if !blur.any_region() {
            return Ok(Redaction {
                image: original,
                settings,
            });
        }
        blur.validate()?;

        let image = match landmarks {
            Some(face) => redact_face(&original, blur, face),
            None => redact_fallback(&original, blur),
        };

        Ok(Redaction { image, settings })
    }
}

fn redact_face(original: &RgbaImage, blur: BlurSettings, face: &FaceLandmarks) -> RgbaImage {
    let (width, height) = original.dimensions();
    let sigma = blur.sigma();
    let mut canvas = original.clone();

    if blur.blur_background {
        let cutout = face_cutout(face);
        let blurred = imageops::blur(original, sigma);
        let full = PixelRect::full(width, height);
        composite(&mut canvas, &blurred, full, full, |x, y| !cutout.contains(x, y));
        debug!("Applied background blur (sigma {sigma})");
    }

    // Sampled from the original, so hair does not stack on background blur.
    if blur.blur_hair {
        let hair = hair_region(face);
        blur_region(&mut canvas, original, &hair, sigma);
        debug!("Applied hair blur around {:?}", hair.center);
    }

    if blur.blur_eyes {
        let eyes = eye_regions(face);
        if eyes.is_empty() {
            debug!("Eye landmarks missing, eye blur skipped");
        }
        for eye in &eyes {
            blur_region(&mut canvas, original, eye, sigma * EYE_BLUR_MULTIPLIER);
        }
    }

    canvas
}

fn redact_fallback(original: &RgbaImage, blur: BlurSettings) -> RgbaImage {
    let mut canvas = original.clone();
    if !(blur.blur_eyes || blur.blur_hair) {
        debug!("No face located and only background blur requested, image left unmodified");
        return canvas;
    }

    let (width, height) = original.dimensions();
    let band_bottom = height as f32 * FALLBACK_TOP_FRACTION;
    let blurred = imageops::blur(original, blur.sigma());
    let full = PixelRect::full(width, height);
    composite(&mut canvas, &blurred, full, full, |_, y| y < band_bottom);
    debug!("Applied fallback blur to top {band_bottom:.0}px");
    canvas
}

/// Blurs `region` of `original` into `canvas`, blurring only a padded crop.
fn blur_region(canvas: &mut RgbaImage, original: &RgbaImage, region: &impl Region, sigma: f32) {
    let (width, height) = original.dimensions();
    let (min, max) = region.bounds();
    let target = PixelRect::from_bounds(min, max, 0.0, width, height);
    if target.is_empty() {
        return;
    }

    let crop = PixelRect::from_bounds(min, max, sigma * KERNEL_REACH, width, height);
    let patch =
        imageops::crop_imm(original, crop.x0, crop.y0, crop.width(), crop.height()).to_image();
    let blurred = imageops::blur(&patch, sigma);
    composite(canvas, &blurred, crop, target, |x, y| region.contains(x, y));
}

/// Copies pixels of `blurred` (positioned at `origin`) into `canvas` for every
/// pixel of `target` whose center satisfies `inside`.
fn composite(
    canvas: &mut RgbaImage,
    blurred: &RgbaImage,
    origin: PixelRect,
    target: PixelRect,
    inside: impl Fn(f32, f32) -> bool,
) {
    for y in target.y0..target.y1 {
        for x in target.x0..target.x1 {
            if inside(x as f32 + 0.5, y as f32 + 0.5) {
                let pixel = *blurred.get_pixel(x - origin.x0, y - origin.y0);
                canvas.put_pixel(x, y, pixel);
            }
        }
    }
}
