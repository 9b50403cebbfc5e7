//! Points, sizes, rotations and small 2D helpers
//!
//! A `Point2D` is either normalized landmark space (0-1) or view pixels.
//! Conversions between the two go through `CoordinateMapper`.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};

// ============================================================================
// POINT / SIZE
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point2D) -> f32 {
        distance(self, other)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Image or view dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: i32,
    pub height: i32,
}

impl Size2D {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns the size unchanged, or `DegenerateSize` tagged with `which`
    pub fn validated(self, which: &'static str) -> MappingResult<Self> {
        if self.is_degenerate() {
            Err(MappingError::DegenerateSize {
                which,
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(self)
        }
    }
}

// ============================================================================
// ROTATION
// ============================================================================

/// Sensor rotation, restricted to quarter turns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(degrees: i32) -> MappingResult<Self> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(MappingError::InvalidRotation(other)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Exact (cos, sin) pair; avoids trig round-off for quarter turns
    pub fn cos_sin(self) -> (f32, f32) {
        match self {
            Rotation::Deg0 => (1.0, 0.0),
            Rotation::Deg90 => (0.0, 1.0),
            Rotation::Deg180 => (-1.0, 0.0),
            Rotation::Deg270 => (0.0, -1.0),
        }
    }

    /// Size of the image frame after rotation (width/height swap on 90/270)
    pub fn rotated_size(self, size: Size2D) -> Size2D {
        match self {
            Rotation::Deg90 | Rotation::Deg270 => Size2D::new(size.height, size.width),
            Rotation::Deg0 | Rotation::Deg180 => size,
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = MappingError;

    fn try_from(degrees: i32) -> MappingResult<Self> {
        Rotation::from_degrees(degrees)
    }
}

// ============================================================================
// RECT
// ============================================================================

/// Axis-aligned rectangle, edges inclusive
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rect covering a view of `size` anchored at the origin
    pub fn from_size(size: Size2D) -> Self {
        Self::new(0.0, 0.0, size.width as f32, size.height as f32)
    }

    pub fn contains(&self, p: Point2D) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn clamp(&self, p: Point2D) -> Point2D {
        Point2D::new(
            p.x.clamp(self.left, self.right),
            p.y.clamp(self.top, self.bottom),
        )
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Euclidean distance
pub fn distance(a: Point2D, b: Point2D) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle of the vector `from -> to` in degrees, range (-180, 180]
pub fn angle_degrees(from: Point2D, to: Point2D) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let angle = dy.atan2(dx).to_degrees();
    if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

pub fn is_point_in_view(p: Point2D, view: Size2D) -> bool {
    Rect::from_size(view).contains(p)
}

pub fn clamp_to_view(p: Point2D, view: Size2D) -> Point2D {
    Rect::from_size(view).clamp(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let d = distance(Point2D::new(0.0, 0.0), Point2D::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_range() {
        let o = Point2D::new(0.0, 0.0);
        assert!((angle_degrees(o, Point2D::new(1.0, 0.0))).abs() < 1e-4);
        assert!((angle_degrees(o, Point2D::new(0.0, 1.0)) - 90.0).abs() < 1e-4);
        assert!((angle_degrees(o, Point2D::new(0.0, -1.0)) + 90.0).abs() < 1e-4);
        // Straight left lands on +180, never -180
        assert!((angle_degrees(o, Point2D::new(-1.0, 0.0)) - 180.0).abs() < 1e-4);
        assert!((angle_degrees(o, Point2D::new(-1.0, -0.0)) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_parsing() {
        assert_eq!(Rotation::from_degrees(270), Ok(Rotation::Deg270));
        assert_eq!(Rotation::try_from(90), Ok(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(45), Err(MappingError::InvalidRotation(45)));
        assert_eq!(Rotation::from_degrees(-90), Err(MappingError::InvalidRotation(-90)));
    }

    #[test]
    fn test_rotated_size_swaps_on_quarter_turns() {
        let size = Size2D::new(640, 480);
        assert_eq!(Rotation::Deg0.rotated_size(size), size);
        assert_eq!(Rotation::Deg180.rotated_size(size), size);
        assert_eq!(Rotation::Deg90.rotated_size(size), Size2D::new(480, 640));
        assert_eq!(Rotation::Deg270.rotated_size(size), Size2D::new(480, 640));
    }

    #[test]
    fn test_rect_contains_and_clamp() {
        let view = Size2D::new(100, 50);
        assert!(is_point_in_view(Point2D::new(100.0, 50.0), view));
        assert!(!is_point_in_view(Point2D::new(-0.5, 10.0), view));

        let clamped = clamp_to_view(Point2D::new(120.0, -3.0), view);
        assert_eq!(clamped, Point2D::new(100.0, 0.0));
    }

    #[test]
    fn test_degenerate_size() {
        assert!(Size2D::new(0, 10).validated("view").is_err());
        assert!(Size2D::new(10, -1).is_degenerate());
        assert!(Size2D::new(1, 1).validated("image").is_ok());
    }
}
