//! Face geometry in image pixel coordinates.

use serde::{Deserialize, Serialize};

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the centroid of a point set, or `None` if empty.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn centroid(points: &[Self]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f32;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Self::new(sx / n, sy / n))
    }
}

/// Axis-aligned face bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Landmarks reported by a face locator for a single face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceLandmarks {
    /// Face bounding box.
    pub bbox: BoundingBox,
    /// Outline points of the left eye.
    pub left_eye: Vec<Point>,
    /// Outline points of the right eye.
    pub right_eye: Vec<Point>,
    /// Jaw outline, ordered from one side of the face to the other.
    pub jawline: Vec<Point>,
}

impl FaceLandmarks {
    #[must_use]
    pub fn left_eye_center(&self) -> Option<Point> {
        Point::centroid(&self.left_eye)
    }

    #[must_use]
    pub fn right_eye_center(&self) -> Option<Point> {
        Point::centroid(&self.right_eye)
    }

    /// Returns true if the bounding box lies within a `width` x `height` image.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.bbox.width > 0.0
            && self.bbox.height > 0.0
            && self.bbox.x >= 0.0
            && self.bbox.y >= 0.0
            && self.bbox.right() <= width as f32
            && self.bbox.bottom() <= height as f32
    }
}
