//! Normalized landmark space ↔ view pixel space
//!
//! The forward transform is a chain of homogeneous 3x3 matrices:
//!
//! ```text
//! view = Letterbox · Mirror · Rotate · ImageScale · normalized
//! ```
//!
//! The inverse is composed from the analytic inverse of each step in
//! reverse order (un-letterbox, un-mirror, un-rotate, un-scale), so it never
//! depends on a numeric matrix inversion.

use nalgebra::{Matrix3, Vector3};

use super::point::{Point2D, Rotation, Size2D};
use crate::error::MappingResult;

/// 3x3 homogeneous transform
type Transform = Matrix3<f32>;

/// Precomputed mapping for one (image, view, rotation, mirror) combination.
///
/// Building it validates the sizes once; mapping afterwards is total for
/// any finite point.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateMapper {
    forward: Transform,
    inverse: Transform,
    image_size: Size2D,
    view_size: Size2D,
    rotation: Rotation,
    mirror: bool,
}

impl CoordinateMapper {
    pub fn new(
        image_size: Size2D,
        view_size: Size2D,
        rotation: Rotation,
        mirror: bool,
    ) -> MappingResult<Self> {
        let image_size = image_size.validated("image")?;
        let view_size = view_size.validated("view")?;

        let (iw, ih) = (image_size.width as f32, image_size.height as f32);
        let rotated = rotation.rotated_size(image_size);
        let (rw, rh) = (rotated.width as f32, rotated.height as f32);
        let (vw, vh) = (view_size.width as f32, view_size.height as f32);

        // Aspect-fit scale and centering offsets
        let scale = (vw / rw).min(vh / rh);
        let offset_x = (vw - rw * scale) / 2.0;
        let offset_y = (vh - rh * scale) / 2.0;

        let forward = letterbox(scale, offset_x, offset_y)
            * mirror_x(mirror, rw)
            * rotate_about_center(rotation, iw, ih, rw, rh)
            * image_scale(iw, ih);

        let inverse = image_scale(1.0 / iw, 1.0 / ih)
            * unrotate_about_center(rotation, iw, ih, rw, rh)
            * mirror_x(mirror, rw)
            * unletterbox(scale, offset_x, offset_y);

        Ok(Self {
            forward,
            inverse,
            image_size,
            view_size,
            rotation,
            mirror,
        })
    }

    pub fn map_to_view(&self, normalized: Point2D) -> Point2D {
        apply(&self.forward, normalized)
    }

    pub fn map_to_normalized(&self, view: Point2D) -> Point2D {
        apply(&self.inverse, view)
    }

    /// Maps a whole trajectory, preserving order
    pub fn map_all_to_view(&self, points: &[Point2D]) -> Vec<Point2D> {
        points.iter().map(|p| self.map_to_view(*p)).collect()
    }

    pub fn image_size(&self) -> Size2D {
        self.image_size
    }

    pub fn view_size(&self) -> Size2D {
        self.view_size
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror
    }
}

/// One-shot forward mapping
pub fn map_normalized_to_view(
    point: Point2D,
    image_size: Size2D,
    view_size: Size2D,
    rotation: Rotation,
    mirror: bool,
) -> MappingResult<Point2D> {
    Ok(CoordinateMapper::new(image_size, view_size, rotation, mirror)?.map_to_view(point))
}

/// One-shot inverse mapping
pub fn map_view_to_normalized(
    point: Point2D,
    image_size: Size2D,
    view_size: Size2D,
    rotation: Rotation,
    mirror: bool,
) -> MappingResult<Point2D> {
    Ok(CoordinateMapper::new(image_size, view_size, rotation, mirror)?.map_to_normalized(point))
}

// ============================================================================
// TRANSFORM STEPS
// ============================================================================

fn apply(m: &Transform, p: Point2D) -> Point2D {
    let v = m * Vector3::new(p.x, p.y, 1.0);
    Point2D::new(v.x, v.y)
}

fn image_scale(sx: f32, sy: f32) -> Transform {
    Transform::new(
        sx,  0.0, 0.0,
        0.0, sy,  0.0,
        0.0, 0.0, 1.0,
    )
}

/// Rotate about the image center, landing in the rotated image's frame
///
/// ```text
/// | c  -s  rw/2 - c·cx + s·cy |
/// | s   c  rh/2 - s·cx - c·cy |
/// | 0   0  1                  |
/// ```
fn rotate_about_center(rotation: Rotation, iw: f32, ih: f32, rw: f32, rh: f32) -> Transform {
    let (c, s) = rotation.cos_sin();
    let (cx, cy) = (iw / 2.0, ih / 2.0);
    Transform::new(
        c,   -s,  rw / 2.0 - c * cx + s * cy,
        s,   c,   rh / 2.0 - s * cx - c * cy,
        0.0, 0.0, 1.0,
    )
}

/// Exact inverse of `rotate_about_center` (transpose of the rotation block)
fn unrotate_about_center(rotation: Rotation, iw: f32, ih: f32, rw: f32, rh: f32) -> Transform {
    let (c, s) = rotation.cos_sin();
    let (qx, qy) = (rw / 2.0, rh / 2.0);
    Transform::new(
        c,   s,   iw / 2.0 - c * qx - s * qy,
        -s,  c,   ih / 2.0 + s * qx - c * qy,
        0.0, 0.0, 1.0,
    )
}

/// Reflect x across the rotated width; self-inverse
fn mirror_x(mirror: bool, rw: f32) -> Transform {
    if mirror {
        Transform::new(
            -1.0, 0.0, rw,
            0.0,  1.0, 0.0,
            0.0,  0.0, 1.0,
        )
    } else {
        Transform::identity()
    }
}

fn letterbox(scale: f32, ox: f32, oy: f32) -> Transform {
    Transform::new(
        scale, 0.0,   ox,
        0.0,   scale, oy,
        0.0,   0.0,   1.0,
    )
}

fn unletterbox(scale: f32, ox: f32, oy: f32) -> Transform {
    let inv = 1.0 / scale;
    Transform::new(
        inv, 0.0, -ox * inv,
        0.0, inv, -oy * inv,
        0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MappingError;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    fn close(a: Point2D, b: Point2D, tol: f32) -> bool {
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
    }

    #[test]
    fn test_identity_when_sizes_match() {
        let size = Size2D::new(1000, 1000);
        let p = map_normalized_to_view(Point2D::new(0.25, 0.75), size, size, Rotation::Deg0, false)
            .unwrap();
        assert!(close(p, Point2D::new(250.0, 750.0), 1e-3));
    }

    #[test]
    fn test_letterbox_centers_image() {
        // 4:3 image in a square view: scale 0.5, bars top and bottom
        let image = Size2D::new(640, 480);
        let view = Size2D::new(320, 320);
        let mapper = CoordinateMapper::new(image, view, Rotation::Deg0, false).unwrap();

        let top_left = mapper.map_to_view(Point2D::new(0.0, 0.0));
        let bottom_right = mapper.map_to_view(Point2D::new(1.0, 1.0));
        assert!(close(top_left, Point2D::new(0.0, 40.0), 1e-3));
        assert!(close(bottom_right, Point2D::new(320.0, 280.0), 1e-3));
    }

    #[test]
    fn test_rotation_90_moves_top_left_to_top_right() {
        let image = Size2D::new(640, 480);
        let view = Size2D::new(480, 640);
        let mapper = CoordinateMapper::new(image, view, Rotation::Deg90, false).unwrap();

        let p = mapper.map_to_view(Point2D::new(0.0, 0.0));
        assert!(close(p, Point2D::new(480.0, 0.0), 1e-3), "got {:?}", p);
    }

    #[test]
    fn test_rotation_180_flips_both_axes() {
        let size = Size2D::new(200, 100);
        let p = map_normalized_to_view(Point2D::new(0.1, 0.2), size, size, Rotation::Deg180, false)
            .unwrap();
        assert!(close(p, Point2D::new(180.0, 80.0), 1e-3), "got {:?}", p);
    }

    #[test]
    fn test_mirror_reflects_x() {
        let size = Size2D::new(1000, 1000);
        let plain = map_normalized_to_view(Point2D::new(0.2, 0.5), size, size, Rotation::Deg0, false)
            .unwrap();
        let mirrored = map_normalized_to_view(Point2D::new(0.2, 0.5), size, size, Rotation::Deg0, true)
            .unwrap();
        assert!(close(plain, Point2D::new(200.0, 500.0), 1e-3));
        assert!(close(mirrored, Point2D::new(800.0, 500.0), 1e-3));
    }

    #[test]
    fn test_round_trip_sweep() {
        let images = [Size2D::new(640, 480), Size2D::new(480, 640), Size2D::new(1280, 720)];
        let views = [Size2D::new(1080, 1920), Size2D::new(1000, 1000), Size2D::new(333, 777)];

        for image in images {
            for view in views {
                for rotation in ROTATIONS {
                    for mirror in [false, true] {
                        let mapper = CoordinateMapper::new(image, view, rotation, mirror).unwrap();
                        for i in 0..=12 {
                            for j in 0..=12 {
                                // Includes the tolerated out-of-bounds band
                                let p = Point2D::new(-0.1 + i as f32 * 0.1, -0.1 + j as f32 * 0.1);
                                let back = mapper.map_to_normalized(mapper.map_to_view(p));
                                assert!(
                                    close(back, p, 1e-3),
                                    "{:?} -> {:?} ({:?} {:?} {:?} {})",
                                    p, back, image, view, rotation, mirror
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_unit_square_lands_inside_view() {
        let image = Size2D::new(640, 480);
        let view = Size2D::new(1080, 1920);
        for rotation in ROTATIONS {
            for mirror in [false, true] {
                let mapper = CoordinateMapper::new(image, view, rotation, mirror).unwrap();
                for corner in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.5, 0.5)] {
                    let p = mapper.map_to_view(Point2D::new(corner.0, corner.1));
                    assert!(p.x >= -1e-3 && p.x <= 1080.0 + 1e-3, "{:?}", p);
                    assert!(p.y >= -1e-3 && p.y <= 1920.0 + 1e-3, "{:?}", p);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_sizes_rejected() {
        let err = CoordinateMapper::new(Size2D::new(640, 480), Size2D::new(0, 100), Rotation::Deg0, false)
            .unwrap_err();
        assert!(matches!(err, MappingError::DegenerateSize { which: "view", .. }));

        let err = CoordinateMapper::new(Size2D::new(-1, 480), Size2D::new(10, 10), Rotation::Deg0, false)
            .unwrap_err();
        assert!(matches!(err, MappingError::DegenerateSize { which: "image", .. }));
    }
}
