//! Whole-trajectory direction by 45° sectors, for the debug read-out

use super::direction::Movement;
use crate::geometry::{angle_degrees, Point2D};

/// Direction from the first to the last point of a trail.
///
/// Displacements under `static_band_px` on both axes are Static. Sectors are
/// centered on the eight compass directions, lower bound inclusive.
pub fn global_direction(points: &[Point2D], static_band_px: f32) -> Movement {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Movement::Unknown;
    };

    let dx = last.x - first.x;
    let dy = last.y - first.y;
    if dx.abs() < static_band_px && dy.abs() < static_band_px {
        return Movement::Static;
    }

    sector_of(angle_degrees(*first, *last))
}

/// Map an angle in (-180, 180] (y down) to its compass sector
pub fn sector_of(angle: f32) -> Movement {
    match angle {
        a if (-22.5..22.5).contains(&a) => Movement::Right,
        a if (22.5..67.5).contains(&a) => Movement::DiagDownRight,
        a if (67.5..112.5).contains(&a) => Movement::Down,
        a if (112.5..157.5).contains(&a) => Movement::DiagDownLeft,
        a if a >= 157.5 || a < -157.5 => Movement::Left,
        a if (-157.5..-112.5).contains(&a) => Movement::DiagUpLeft,
        a if (-112.5..-67.5).contains(&a) => Movement::Up,
        a if (-67.5..-22.5).contains(&a) => Movement::DiagUpRight,
        _ => Movement::Unknown,
    }
}
