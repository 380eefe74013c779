//! Clip regions used by the redactor.
//!
//! Pixels are tested at their centers, `(x + 0.5, y + 0.5)`.

// Pixel coordinates comfortably fit in f32 / u32.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::domain::{FaceLandmarks, Point};

/// Inclusive-exclusive pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    /// Covers the whole image.
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    /// Converts float bounds to pixels, grown by `pad` and clamped to the image.
    #[must_use]
    pub fn from_bounds(min: Point, max: Point, pad: f32, width: u32, height: u32) -> Self {
        let clamp = |v: f32, hi: u32| v.max(0.0).min(hi as f32) as u32;
        Self {
            x0: clamp((min.x - pad).floor(), width),
            y0: clamp((min.y - pad).floor(), height),
            x1: clamp((max.x + pad).ceil(), width),
            y1: clamp((max.y + pad).ceil(), height),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }
}

/// A closed area that can be tested point by point.
pub trait Region {
    /// Returns true if the point lies inside.
    fn contains(&self, x: f32, y: f32) -> bool;

    /// Float bounding box `(min, max)` of the region.
    fn bounds(&self) -> (Point, Point);
}

/// Axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f32,
    pub ry: f32,
}

impl Region for Ellipse {
    fn contains(&self, x: f32, y: f32) -> bool {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return false;
        }
        let dx = (x - self.center.x) / self.rx;
        let dy = (y - self.center.y) / self.ry;
        dx * dx + dy * dy <= 1.0
    }

    fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.center.x - self.rx, self.center.y - self.ry),
            Point::new(self.center.x + self.rx, self.center.y + self.ry),
        )
    }
}

/// Closed polygon filled with the nonzero winding rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    #[must_use]
    pub const fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    fn winding_number(&self, x: f32, y: f32) -> i32 {
        let n = self.vertices.len();
        let mut winding = 0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let side = (b.x - a.x) * (y - a.y) - (x - a.x) * (b.y - a.y);
            if a.y <= y {
                if b.y > y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= y && side < 0.0 {
                winding -= 1;
            }
        }
        winding
    }
}

impl Region for Polygon {
    fn contains(&self, x: f32, y: f32) -> bool {
        self.vertices.len() >= 3 && self.winding_number(x, y) != 0
    }

    fn bounds(&self) -> (Point, Point) {
        self.vertices.iter().fold(
            (
                Point::new(f32::INFINITY, f32::INFINITY),
                Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |(min, max), p| {
                (
                    Point::new(min.x.min(p.x), min.y.min(p.y)),
                    Point::new(max.x.max(p.x), max.y.max(p.y)),
                )
            },
        )
    }
}

/// Hairline height above the face box, as a fraction of box height.
const FOREHEAD_MARGIN: f32 = 0.3;
/// Hair band top, as a fraction of box height above the box.
const HAIR_ABOVE: f32 = 0.5;
/// Hair band bottom, as a fraction of box height below the box top.
const HAIR_BELOW: f32 = 0.15;
/// Horizontal overhang of the hair band on each side.
const HAIR_OVERHANG: f32 = 0.1;
/// Eye ellipse half-width, as a fraction of the inter-eye distance.
const EYE_WIDTH_RATIO: f32 = 0.4;
/// Eye ellipse aspect ratio (height / width).
const EYE_ASPECT: f32 = 0.6;

/// The face area left sharp by background blur.
///
/// Follows the jaw outline, then closes over an estimated hairline above the
/// bounding box.
#[must_use]
pub fn face_cutout(face: &FaceLandmarks) -> Polygon {
    let bbox = face.bbox;
    let top_of_head = bbox.y - bbox.height * FOREHEAD_MARGIN;
    let mut vertices = face.jawline.clone();
    vertices.push(Point::new(bbox.right(), top_of_head));
    vertices.push(Point::new(bbox.x, top_of_head));
    Polygon::new(vertices)
}

/// Elliptical hair region above the face.
#[must_use]
pub fn hair_region(face: &FaceLandmarks) -> Ellipse {
    let bbox = face.bbox;
    let top = (bbox.y - bbox.height * HAIR_ABOVE).max(0.0);
    let bottom = bbox.y + bbox.height * HAIR_BELOW;
    let left = bbox.x - bbox.width * HAIR_OVERHANG;
    let right = bbox.right() + bbox.width * HAIR_OVERHANG;
    Ellipse {
        center: Point::new(bbox.center_x(), top + (bottom - top) / 2.0),
        rx: (right - left) / 2.0,
        ry: (bottom - top) / 2.0,
    }
}

/// One ellipse per eye, sized from the inter-eye distance.
///
/// Empty when either eye has no landmark points.
#[must_use]
pub fn eye_regions(face: &FaceLandmarks) -> Vec<Ellipse> {
    let (Some(left), Some(right)) = (face.left_eye_center(), face.right_eye_center()) else {
        return Vec::new();
    };
    let rx = (right.x - left.x).abs() * EYE_WIDTH_RATIO;
    let ry = rx * EYE_ASPECT;
    if rx <= 0.0 {
        return Vec::new();
    }
    vec![
        Ellipse { center: left, rx, ry },
        Ellipse {
            center: right,
            rx,
            ry,
        },
    ]
}
