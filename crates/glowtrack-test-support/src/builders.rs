//! Synthetic image builders and landmark fixtures for testing.

use glowtrack_core::domain::{BoundingBox, FaceLandmarks, Point};
use glowtrack_core::pipeline::png_data_url;
use image::{DynamicImage, Rgba, RgbaImage};

/// Builder for creating synthetic test images.
///
/// High-contrast patterns make blur easy to detect pixel by pixel: any blurred
/// pixel of a checkerboard moves away from pure black or white.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a black and white checkerboard with 8px cells.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> DynamicImage {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let cell = cell_size.max(1);
        let img = RgbaImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    /// Creates a single-color image.
    #[must_use]
    pub fn uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255])))
    }

    /// Creates a 200x200 checkerboard that [`face_fixture`] fits inside.
    #[must_use]
    pub fn face_scene() -> DynamicImage {
        Self::checkerboard(200, 200)
    }

    /// Encodes `image` as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn data_url(image: &DynamicImage) -> glowtrack_core::Result<String> {
        png_data_url(image)
    }
}

/// Landmarks for a face in the middle of a 200x200 frame.
///
/// Box `(60, 70) 80x100`, eyes centered at `(80, 110)` and `(120, 110)`, jaw
/// running from `(60, 110)` down to the chin at `(100, 170)` and back up to
/// `(140, 110)`. The cutout is clear around `(100, 140)`.
#[must_use]
pub fn face_fixture() -> FaceLandmarks {
    FaceLandmarks {
        bbox: BoundingBox::new(60.0, 70.0, 80.0, 100.0),
        left_eye: vec![
            Point::new(74.0, 110.0),
            Point::new(80.0, 107.0),
            Point::new(86.0, 110.0),
            Point::new(80.0, 113.0),
        ],
        right_eye: vec![
            Point::new(114.0, 110.0),
            Point::new(120.0, 107.0),
            Point::new(126.0, 110.0),
            Point::new(120.0, 113.0),
        ],
        jawline: vec![
            Point::new(60.0, 110.0),
            Point::new(66.0, 135.0),
            Point::new(80.0, 158.0),
            Point::new(100.0, 170.0),
            Point::new(120.0, 158.0),
            Point::new(134.0, 135.0),
            Point::new(140.0, 110.0),
        ],
    }
}
